// components/media_downloader/src/types.rs
use crate::metadata::{FlatMetadata, ReleaseMetadata};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("url is required")]
    MissingUrl,

    #[error("Required dependency not found: {tool} ({hint})")]
    DependencyNotFound { tool: &'static str, hint: String },

    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to start {program}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}\n{output}")]
    CommandFailed {
        program: String,
        status: String,
        output: String,
    },

    #[error("no new {format} files found in {} after download", dir.display())]
    NothingDownloaded { dir: PathBuf, format: String },

    #[error("failed to scan {}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("io error during {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cover file {} is not accessible", path.display())]
    CoverNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialise HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to download cover from {url}")]
    CoverDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cover download from {url} returned status {status}")]
    CoverStatus { url: String, status: u16 },

    #[error("failed to tag {} ({} file(s) tagged before the failure)", file.display(), tagged.len())]
    TaggingFailed {
        file: PathBuf,
        tagged: Vec<PathBuf>,
        #[source]
        source: Box<DownloadError>,
    },
}

impl DownloadError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        DownloadError::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Where the tags written to each downloaded file come from
#[derive(Debug, Clone)]
pub enum TagSource {
    /// The same tags on every file, taken verbatim
    Manual(FlatMetadata),
    /// Album defaults merged with the matching per-track record
    Release(ReleaseMetadata),
}

impl Default for TagSource {
    fn default() -> Self {
        TagSource::Manual(FlatMetadata::default())
    }
}

/// A single download-and-tag run
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Video or playlist URL handed to the downloader
    pub url: String,

    /// Directory the downloader writes into
    pub output_dir: PathBuf,

    /// Audio format / file extension, `mp3` when empty
    pub audio_format: String,

    /// Local path or URL of the cover image
    pub cover: Option<String>,

    pub tags: TagSource,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_dir: output_dir.into(),
            audio_format: DEFAULT_AUDIO_FORMAT.to_string(),
            cover: None,
            tags: TagSource::default(),
        }
    }

    /// Normalised audio format: lower case, no leading dot, defaulting to mp3
    pub fn format(&self) -> String {
        let format = self.audio_format.trim().trim_start_matches('.').to_lowercase();
        if format.is_empty() {
            DEFAULT_AUDIO_FORMAT.to_string()
        } else {
            format
        }
    }

    /// Cover source to embed; a cover found by the metadata lookup wins
    pub fn cover_source<'a>(&'a self) -> Option<&'a str> {
        let release_cover = match &self.tags {
            TagSource::Release(release) => release.album.cover.as_deref(),
            TagSource::Manual(_) => None,
        };
        let present = |source: Option<&'a str>| source.map(str::trim).filter(|s| !s.is_empty());
        present(release_cover).or_else(|| present(self.cover.as_deref()))
    }
}

pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";
