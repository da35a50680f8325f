// components/media_downloader/src/utils.rs
use crate::types::DownloadError;
use std::path::Path;

const INDEX_SEPARATOR: &str = " - ";

/// Recover the playlist index from a `"N - title.ext"` file name.
///
/// Only the first `" - "` after the start of the base name is considered;
/// `None` when it is missing or the prefix is not a number.
pub fn extract_track_index(file_name: impl AsRef<Path>) -> Option<u32> {
    let base = file_name.as_ref().file_name()?.to_str()?;

    let (offset, _) = base
        .match_indices(INDEX_SEPARATOR)
        .find(|(offset, _)| *offset > 0)?;

    base[..offset].parse().ok()
}

/// True when the value has both a scheme and a host
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| url.has_host() && !url.scheme().is_empty())
        .unwrap_or(false)
}

/// Paths are handed to external tools as UTF-8 arguments
pub fn path_arg(path: &Path) -> Result<String, DownloadError> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| DownloadError::InvalidPath(path.to_path_buf()))
}
