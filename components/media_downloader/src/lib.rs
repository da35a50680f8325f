// components/media_downloader/src/lib.rs
mod cover;
mod ffmpeg;
mod metadata;
mod runner;
mod snapshot;
mod tools;
mod types;
mod utils;
mod ytdlp;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use cover::{resolve_cover, CoverArt};
pub use metadata::{
    format_track_number, merge, AlbumMetadata, FlatMetadata, ReleaseMetadata, TrackMetadata,
};
pub use runner::{CommandRunner, ProcessRunner};
pub use snapshot::{diff, snapshot, FileSet};
pub use tools::ToolPaths;
pub use types::{DownloadError, DownloadRequest, TagSource, DEFAULT_AUDIO_FORMAT};
pub use utils::extract_track_index;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct MediaDownloader {
    tools: ToolPaths,
    runner: Arc<dyn CommandRunner + Send + Sync>,
    http: reqwest::Client,
}

impl MediaDownloader {
    /// Create a MediaDownloader that runs the real tools
    pub fn new(tools: ToolPaths) -> Result<Self, DownloadError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(DownloadError::HttpClient)?;
        Ok(Self::with_runner(tools, Arc::new(ProcessRunner), http))
    }

    /// Create a MediaDownloader with a specific command runner
    pub fn with_runner(
        tools: ToolPaths,
        runner: Arc<dyn CommandRunner + Send + Sync>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            tools,
            runner,
            http,
        }
    }

    /// Download audio from the request URL, tag every file the download
    /// produced and return their paths relative to the output directory.
    ///
    /// Files that existed before the download are never touched. When
    /// tagging fails, files tagged so far stay on disk and are listed in
    /// the error.
    pub async fn download(&self, request: &DownloadRequest) -> Result<Vec<PathBuf>, DownloadError> {
        let url = request.url.trim();
        if url.is_empty() {
            return Err(DownloadError::MissingUrl);
        }

        let output_dir = if request.output_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            request.output_dir.clone()
        };
        let format = request.format();
        let extension = ffmpeg::extension_for(&format);

        tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
            DownloadError::io(format!("create output dir {}", output_dir.display()), e)
        })?;

        let before = snapshot(&output_dir, extension)?;

        tracing::info!(url, dir = %output_dir.display(), "fetching audio");
        let args = ytdlp::build_download_args(url, &output_dir, &format, Some(&self.tools.ffmpeg))?;
        self.runner.run(&self.tools.yt_dlp, &args).await?;

        let after = snapshot(&output_dir, extension)?;
        let new_files = diff(&before, &after);
        if new_files.is_empty() {
            return Err(DownloadError::NothingDownloaded {
                dir: output_dir,
                format,
            });
        }
        tracing::info!("downloaded {} file(s)", new_files.len());

        // Dropping the cover at the end of this scope removes a downloaded temp file
        let cover = match resolve_cover(&self.http, request.cover_source()).await {
            Ok(cover) => cover,
            Err(e) => {
                tracing::warn!("cover preparation failed, tagging without artwork: {}", e);
                None
            }
        };

        let has_tags = match &request.tags {
            TagSource::Manual(flat) => !flat.is_empty(),
            TagSource::Release(_) => true,
        };
        if !has_tags && cover.is_none() {
            tracing::info!("no metadata or cover to apply");
            return Ok(new_files);
        }

        for warning in track_matching_warnings(&request.tags, &new_files) {
            tracing::warn!("{}", warning);
        }

        let cover_path = cover.as_ref().map(CoverArt::path);
        let mut tagged = Vec::with_capacity(new_files.len());
        for (i, file) in new_files.iter().enumerate() {
            tracing::info!("tagging {}/{}: {}", i + 1, new_files.len(), file.display());

            let meta = metadata_for(&request.tags, file, i);
            let result = self
                .tag_file(&output_dir.join(file), extension, &meta, cover_path)
                .await;

            if let Err(e) = result {
                return Err(DownloadError::TaggingFailed {
                    file: file.clone(),
                    tagged,
                    source: Box::new(e),
                });
            }
            tagged.push(file.clone());
        }

        tracing::info!("metadata applied to {} file(s)", tagged.len());
        Ok(new_files)
    }

    /// Tag into a sibling file and only replace the original once the
    /// tagger succeeded
    async fn tag_file(
        &self,
        path: &Path,
        extension: &str,
        meta: &FlatMetadata,
        cover: Option<&Path>,
    ) -> Result<(), DownloadError> {
        let tagged_path = tagged_path(path);
        let _ = tokio::fs::remove_file(&tagged_path).await;

        let args = ffmpeg::build_tag_args(path, &tagged_path, extension, meta, cover)?;
        if let Err(e) = self.runner.run(&self.tools.ffmpeg, &args).await {
            let _ = tokio::fs::remove_file(&tagged_path).await;
            return Err(e);
        }

        tokio::fs::rename(&tagged_path, path)
            .await
            .map_err(|e| DownloadError::io(format!("replace {}", path.display()), e))
    }
}

fn tagged_path(path: &Path) -> PathBuf {
    let mut tagged = path.as_os_str().to_owned();
    tagged.push(".tagged");
    PathBuf::from(tagged)
}

/// Places where track records may be paired with the wrong files: a track
/// count that differs from the file count, and files whose name carries no
/// playlist index.
fn track_matching_warnings(tags: &TagSource, files: &[PathBuf]) -> Vec<String> {
    let release = match tags {
        TagSource::Release(release) if !release.tracks.is_empty() => release,
        _ => return Vec::new(),
    };

    let mut warnings = Vec::new();
    if release.tracks.len() != files.len() {
        warnings.push(format!(
            "{} track record(s) for {} downloaded file(s); check the tags of every file",
            release.tracks.len(),
            files.len()
        ));
    }
    for file in files {
        if extract_track_index(file).filter(|n| *n > 0).is_none() {
            warnings.push(format!(
                "no playlist index in {}, matching by download order",
                file.display()
            ));
        }
    }
    warnings
}

/// Tags for the `file_index`-th new file.
///
/// The playlist index recovered from the file name selects the track
/// record; the position in the sorted file list is the fallback.
fn metadata_for(tags: &TagSource, file: &Path, file_index: usize) -> FlatMetadata {
    let release = match tags {
        TagSource::Manual(flat) => return flat.clone(),
        TagSource::Release(release) => release,
    };

    let track_index = extract_track_index(file)
        .filter(|n| *n > 0)
        .unwrap_or(file_index as u32 + 1);

    let empty = TrackMetadata::default();
    let track = release.track_for(track_index, file_index).unwrap_or(&empty);
    merge(&release.album, track, track_index)
}
