// bases/download_cli/src/app.rs
use crate::args::Args;
use crate::config::{self, AlbumConfig, BatchConfig};
use crate::output::OutputHandler;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_downloader::{DownloadRequest, MediaDownloader, ReleaseMetadata, TagSource, ToolPaths};
use musicbrainz_client::MusicBrainzClient;

pub struct App {
    args: Args,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let output = OutputHandler::new(args.verbose);
        Self { args, output }
    }

    pub async fn run(&self) -> Result<()> {
        if self.args.example_config {
            print!("{}", config::EXAMPLE);
            return Ok(());
        }

        if let Some(path) = &self.args.config {
            let batch = BatchConfig::load(path)?;
            let downloader = self.downloader()?;
            let mut musicbrainz = MusicBrainzClient::new()?;
            return self.run_batch(&downloader, &mut musicbrainz, &batch).await;
        }

        let url = self
            .single_url()
            .ok_or_else(|| eyre!("a URL is required unless --config is given"))?;
        let downloader = self.downloader()?;
        self.run_single(&downloader, url).await
    }

    fn downloader(&self) -> Result<MediaDownloader> {
        let tools = ToolPaths::resolve(
            self.args.yt_dlp_path.as_deref(),
            self.args.ffmpeg_path.as_deref(),
        )?;
        Ok(MediaDownloader::new(tools)?)
    }

    fn single_url(&self) -> Option<&str> {
        self.args
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    async fn run_single(&self, downloader: &MediaDownloader, url: &str) -> Result<()> {
        let mut request = DownloadRequest::new(url, &self.args.output_dir);
        request.audio_format = self.args.format.clone();
        request.cover = self.args.cover.clone();
        request.tags = TagSource::Manual(self.args.tags.to_flat());

        if self.args.wants_musicbrainz() {
            let mut musicbrainz = MusicBrainzClient::new()?;
            let lookup = self
                .lookup(
                    &mut musicbrainz,
                    self.args.musicbrainz_id.as_deref(),
                    self.args.auto_fetch_metadata.as_deref(),
                )
                .await;
            if let Some(mut release) = lookup {
                release.album.overlay(&self.args.tags.album_overrides());
                request.tags = TagSource::Release(release);
            }
        }

        self.output.print_download_start(url);
        let files = downloader.download(&request).await?;
        self.output.print_download_complete(&request.output_dir, &files);

        Ok(())
    }

    /// Process every album in order. A failing album is reported and the
    /// batch moves on; the run fails at the end if any album did.
    pub async fn run_batch(
        &self,
        downloader: &MediaDownloader,
        musicbrainz: &mut MusicBrainzClient,
        batch: &BatchConfig,
    ) -> Result<()> {
        let total = batch.albums.len();
        let mut failed = Vec::new();

        for (i, album) in batch.albums.iter().enumerate() {
            self.output.print_album_header(i + 1, total, album);

            let mut request = album.to_request(&self.args.output_dir, &self.args.format);
            if album.needs_musicbrainz_lookup() {
                if let Some(release) = self.lookup_album(musicbrainz, album).await {
                    request.tags = TagSource::Release(release);
                }
            }

            match downloader.download(&request).await {
                Ok(files) => self.output.print_download_complete(&request.output_dir, &files),
                Err(e) => {
                    tracing::error!(album = album.display_name(), "album failed: {}", e);
                    self.output.print_album_failed(album, &e);
                    failed.push(album.display_name().to_string());
                }
            }
        }

        self.output.print_batch_summary(total, &failed);
        if !failed.is_empty() {
            return Err(eyre!("{} of {} album(s) failed", failed.len(), total));
        }
        Ok(())
    }

    async fn lookup_album(
        &self,
        client: &mut MusicBrainzClient,
        album: &AlbumConfig,
    ) -> Option<ReleaseMetadata> {
        let mut release = self
            .lookup(client, album.musicbrainz_id.as_deref(), album.auto_fetch.as_deref())
            .await?;
        album.apply_to(&mut release);
        Some(release)
    }

    /// Release tags from MusicBrainz; failures only cost the looked-up tags
    async fn lookup(
        &self,
        client: &mut MusicBrainzClient,
        id: Option<&str>,
        query: Option<&str>,
    ) -> Option<ReleaseMetadata> {
        match client.resolve_release(id, query).await {
            Ok(release) => {
                self.output.print_release_found(&release);
                Some(release)
            }
            Err(e) => {
                tracing::warn!("MusicBrainz lookup failed: {}", e);
                self.output.print_lookup_failed(&e);
                None
            }
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use media_downloader::{CommandRunner, DownloadError};
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// A tagger invocation with the bytes of its cover input, if any
    struct Tagging {
        args: Vec<String>,
        cover: Option<Vec<u8>>,
    }

    impl Tagging {
        fn has_tag(&self, tag: &str) -> bool {
            self.args.windows(2).any(|w| w[0] == "-metadata" && w[1] == tag)
        }
    }

    /// Fakes yt-dlp by writing one track per URL, failing URLs containing
    /// "broken"; fakes ffmpeg by writing its output file
    #[derive(Default)]
    struct FakeTools {
        urls: Mutex<Vec<String>>,
        taggings: Mutex<Vec<Tagging>>,
    }

    #[async_trait]
    impl CommandRunner for FakeTools {
        async fn run(&self, program: &Path, args: &[String]) -> Result<String, DownloadError> {
            let last = args.last().cloned().unwrap_or_default();
            let write = |path: PathBuf| async move {
                tokio::fs::write(&path, b"audio")
                    .await
                    .map_err(|e| DownloadError::io("fake tool", e))
            };

            if program.ends_with("yt-dlp") {
                self.urls.lock().push(last.clone());
                if last.contains("broken") {
                    return Err(DownloadError::CommandFailed {
                        program: "yt-dlp".to_string(),
                        status: "exit status: 1".to_string(),
                        output: "ERROR: Video unavailable".to_string(),
                    });
                }
                let template = args
                    .iter()
                    .position(|a| a == "-o")
                    .and_then(|i| args.get(i + 1))
                    .map(PathBuf::from)
                    .unwrap_or_default();
                let dir = template.parent().map(Path::to_path_buf).unwrap_or_default();
                write(dir.join("1 - Song.mp3")).await?;
            } else {
                let cover_input = args
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| *a == "-i")
                    .nth(1)
                    .and_then(|(i, _)| args.get(i + 1));
                let cover = match cover_input {
                    Some(path) => tokio::fs::read(path).await.ok(),
                    None => None,
                };
                self.taggings.lock().push(Tagging {
                    args: args.to_vec(),
                    cover,
                });
                write(PathBuf::from(last)).await?;
            }
            Ok(String::new())
        }
    }

    fn http() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn downloader(tools: Arc<FakeTools>) -> MediaDownloader {
        let paths = ToolPaths {
            yt_dlp: PathBuf::from("/usr/bin/yt-dlp"),
            ffmpeg: PathBuf::from("/usr/bin/ffmpeg"),
        };
        MediaDownloader::with_runner(paths, tools, http())
    }

    fn musicbrainz(base: &str) -> MusicBrainzClient {
        MusicBrainzClient::with_http_client(http(), &format!("{}/ws/2", base), &format!("{}/caa", base))
            .with_min_interval(Duration::ZERO)
    }

    fn app(output_dir: &Path) -> App {
        let dir = output_dir.to_string_lossy().into_owned();
        App::new(Args::try_parse_from(["download-cli", "--output-dir", dir.as_str()]).unwrap())
    }

    /// Loopback MusicBrainz, Cover Art Archive and image host for release
    /// `rel-1`; everything else is a 404
    async fn serve_musicbrainz() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let release = r#"{
            "id": "rel-1",
            "title": "Commit This to Memory",
            "date": "2005-06-07",
            "artist-credit": [{"name": "Motion City Soundtrack", "joinphrase": ""}],
            "media": [{"position": 1, "tracks": [
                {"title": "Attractive Today", "length": 187000, "position": 1}
            ]}]
        }"#
        .to_string();
        let cover = format!(
            r#"{{"images": [{{"image": "{}/img/front.jpg", "front": true}}]}}"#,
            base
        );
        let routes: Vec<(&str, String)> = vec![
            ("/ws/2/release/rel-1", release),
            ("/caa/release/rel-1", cover),
            ("/img/front.jpg", "looked-up cover".to_string()),
        ];

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buffer[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request);
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _)| target.starts_with(prefix))
                    .map(|(_, body)| (200, body.as_str()))
                    .unwrap_or((404, "{}"));
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        base
    }

    #[tokio::test]
    async fn test_batch_continues_after_failed_album() {
        let root = tempfile::tempdir().unwrap();
        let yaml = format!(
            "albums:\n  - url: https://example.com/broken\n    album: Lost\n  - url: https://example.com/ok\n    album: Kept\n    output_dir: {}\n",
            root.path().join("kept").display()
        );
        let batch = BatchConfig::parse(&yaml).unwrap();
        let tools = Arc::new(FakeTools::default());

        let result = app(root.path())
            .run_batch(&downloader(tools.clone()), &mut musicbrainz("http://127.0.0.1:9"), &batch)
            .await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("1 of 2 album(s) failed"), "{}", error);
        assert_eq!(
            *tools.urls.lock(),
            vec!["https://example.com/broken", "https://example.com/ok"]
        );
        assert!(root.path().join("kept/1 - Song.mp3").exists());
    }

    #[tokio::test]
    async fn test_batch_defaults_to_cli_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let batch = BatchConfig::parse("albums:\n  - url: https://example.com/ok\n").unwrap();
        let tools = Arc::new(FakeTools::default());

        app(root.path())
            .run_batch(&downloader(tools), &mut musicbrainz("http://127.0.0.1:9"), &batch)
            .await
            .unwrap();

        assert!(root.path().join("1 - Song.mp3").exists());
    }

    #[tokio::test]
    async fn test_batch_lookup_tags_with_release_and_looked_up_cover() {
        let root = tempfile::tempdir().unwrap();
        let local_cover = root.path().join("local.jpg");
        std::fs::write(&local_cover, b"local cover").unwrap();
        let yaml = format!(
            "albums:\n  - url: https://example.com/ok\n    musicbrainz_id: rel-1\n    genre: Emo\n    cover: {}\n",
            local_cover.display()
        );
        let batch = BatchConfig::parse(&yaml).unwrap();
        let tools = Arc::new(FakeTools::default());
        let base = serve_musicbrainz().await;

        app(root.path())
            .run_batch(&downloader(tools.clone()), &mut musicbrainz(&base), &batch)
            .await
            .unwrap();

        let taggings = tools.taggings.lock();
        assert_eq!(taggings.len(), 1);
        let tagging = &taggings[0];
        assert_eq!(tagging.cover.as_deref(), Some(&b"looked-up cover"[..]));
        assert!(tagging.has_tag("title=Attractive Today"), "{:?}", tagging.args);
        assert!(tagging.has_tag("album=Commit This to Memory"), "{:?}", tagging.args);
        assert!(tagging.has_tag("artist=Motion City Soundtrack"), "{:?}", tagging.args);
        assert!(tagging.has_tag("genre=Emo"), "{:?}", tagging.args);
        assert!(tagging.has_tag("track=1/1"), "{:?}", tagging.args);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_configured_cover() {
        let root = tempfile::tempdir().unwrap();
        let local_cover = root.path().join("local.jpg");
        std::fs::write(&local_cover, b"local cover").unwrap();
        let yaml = format!(
            "albums:\n  - url: https://example.com/ok\n    musicbrainz_id: missing\n    album: Kept\n    cover: {}\n",
            local_cover.display()
        );
        let batch = BatchConfig::parse(&yaml).unwrap();
        let tools = Arc::new(FakeTools::default());
        let base = serve_musicbrainz().await;

        app(root.path())
            .run_batch(&downloader(tools.clone()), &mut musicbrainz(&base), &batch)
            .await
            .unwrap();

        let taggings = tools.taggings.lock();
        assert_eq!(taggings[0].cover.as_deref(), Some(&b"local cover"[..]));
        assert!(taggings[0].has_tag("album=Kept"), "{:?}", taggings[0].args);
    }

    #[tokio::test]
    async fn test_single_mode_requires_url() {
        let app = App::new(Args::try_parse_from(["download-cli"]).unwrap());

        let error = app.run().await.unwrap_err();
        assert!(error.to_string().contains("URL is required"));
    }

    #[tokio::test]
    async fn test_example_config_needs_no_tools() {
        let app = App::new(Args::try_parse_from(["download-cli", "--example-config"]).unwrap());
        app.run().await.unwrap();
    }
}
