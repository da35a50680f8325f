// bases/download_cli/src/config.rs
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use media_downloader::{
    AlbumMetadata, DownloadRequest, FlatMetadata, ReleaseMetadata, TagSource, TrackMetadata,
};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const EXAMPLE: &str = r#"# download-cli batch configuration
albums:
  # Tags written from this file
  - url: "https://youtube.com/playlist?list=PLxxxxxx"
    artist: "Black Kids"
    album: "Partie Traumatic"
    year: 2008
    genre: "Indie Pop"
    cover: "https://example.com/cover.jpg"
    output_dir: "./music/Black Kids"
    tracks:
      - {num: 1, title: "Hit The Heartbrakes"}
      - {num: 2, title: "Partie Traumatic"}
      - {num: 3, title: "I'm Not Gonna Teach Your Boyfriend How to Dance with You"}

  # Tags fetched from a MusicBrainz release
  - url: "https://youtube.com/playlist?list=PLyyyyyy"
    musicbrainz_id: "abc-123-def-456"
    output_dir: "./music/Motion City Soundtrack"
    format: m4a

  # Best MusicBrainz search match for "Artist - Album"
  - url: "https://youtube.com/playlist?list=PLzzzzzz"
    auto_fetch: "Motion City Soundtrack - Commit This to Memory"
    output_dir: "./music/Motion City Soundtrack"
"#;

#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub albums: Vec<AlbumConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlbumConfig {
    pub url: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub year: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    pub cover: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub musicbrainz_id: Option<String>,

    /// MusicBrainz search query, "Artist - Album"
    pub auto_fetch: Option<String>,
    pub tracks: Vec<TrackConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub num: u32,
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub duration: Option<String>,
    pub comment: Option<String>,
}

/// Accepts numbers and booleans where a string is expected, so that
/// `year: 2008` reads the same as `year: "2008"`
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {:?}",
            other
        ))),
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&data).wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let config: BatchConfig = serde_yaml::from_str(data).wrap_err("failed to parse config")?;

        if config.albums.is_empty() {
            bail!("no albums defined in configuration");
        }
        for (i, album) in config.albums.iter().enumerate() {
            if album.url.trim().is_empty() {
                bail!("album {}: url is required", i + 1);
            }
        }

        Ok(config)
    }
}

impl AlbumConfig {
    pub fn needs_musicbrainz_lookup(&self) -> bool {
        text(&self.musicbrainz_id).is_some() || text(&self.auto_fetch).is_some()
    }

    /// Name used in progress output and the failure summary
    pub fn display_name(&self) -> &str {
        text(&self.album).unwrap_or(self.url.trim())
    }

    /// Download request for this album. Album-level fields fall back to the
    /// command line's output directory and format.
    pub fn to_request(&self, default_output_dir: &Path, default_format: &str) -> DownloadRequest {
        let output_dir = match &self.output_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => default_output_dir.to_path_buf(),
        };

        let mut request = DownloadRequest::new(self.url.trim(), output_dir);
        request.audio_format = text(&self.format).unwrap_or(default_format).to_string();
        request.cover = text(&self.cover).map(str::to_owned);
        request.tags = match self.release_metadata() {
            Some(release) => TagSource::Release(release),
            None => TagSource::Manual(FlatMetadata {
                genre: self.genre.clone(),
                year: self.year.clone(),
                comment: self.comment.clone(),
                ..Default::default()
            }),
        };
        request
    }

    /// Release described by this file alone, when it names an artist, an
    /// album or any tracks
    pub fn release_metadata(&self) -> Option<ReleaseMetadata> {
        if self.tracks.is_empty() && text(&self.artist).is_none() && text(&self.album).is_none() {
            return None;
        }

        let mut album = self.album_overrides();
        if album.album_artist.is_none() {
            album.album_artist = album.artist.clone();
        }
        album.total_tracks = Some(self.tracks.len() as u32).filter(|n| *n > 0);

        Some(ReleaseMetadata {
            album,
            tracks: self.track_overrides(),
        })
    }

    fn album_overrides(&self) -> AlbumMetadata {
        let owned = |value: &Option<String>| text(value).map(str::to_owned);
        AlbumMetadata {
            title: owned(&self.album),
            artist: owned(&self.artist),
            album_artist: owned(&self.album_artist),
            year: owned(&self.year),
            genre: owned(&self.genre),
            comment: owned(&self.comment),
            cover: owned(&self.cover),
            ..Default::default()
        }
    }

    fn track_overrides(&self) -> Vec<TrackMetadata> {
        self.tracks
            .iter()
            .map(|track| TrackMetadata {
                position: Some(track.num).filter(|n| *n > 0),
                title: track.title.clone(),
                artist: track.artist.clone(),
                composer: track.composer.clone(),
                duration: track.duration.clone(),
                comment: track.comment.clone(),
                ..Default::default()
            })
            .collect()
    }

    /// Layer the fields set in this file over a looked-up release. The
    /// looked-up cover is kept; the configured one stays on the request
    /// as the fallback.
    pub fn apply_to(&self, release: &mut ReleaseMetadata) {
        let overrides = AlbumMetadata {
            cover: None,
            ..self.album_overrides()
        };
        release.album.overlay(&overrides);
        release.overlay_tracks(&self.track_overrides());
    }
}
