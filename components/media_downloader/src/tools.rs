// components/media_downloader/src/tools.rs
use crate::types::DownloadError;
use std::path::{Path, PathBuf};

/// Locations of the external tools used for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub yt_dlp: PathBuf,
    pub ffmpeg: PathBuf,
}

impl ToolPaths {
    /// Use the explicit paths when given, otherwise search `PATH`
    pub fn resolve(
        yt_dlp: Option<&Path>,
        ffmpeg: Option<&Path>,
    ) -> Result<Self, DownloadError> {
        Ok(Self {
            yt_dlp: resolve_tool("yt-dlp", yt_dlp)?,
            ffmpeg: resolve_tool("ffmpeg", ffmpeg)?,
        })
    }
}

fn resolve_tool(name: &'static str, explicit: Option<&Path>) -> Result<PathBuf, DownloadError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DownloadError::DependencyNotFound {
            tool: name,
            hint: format!("{} is not an executable file", path.display()),
        });
    }

    let found = which::which(name).map_err(|_| DownloadError::DependencyNotFound {
        tool: name,
        hint: format!("install it or pass --{}-path", name),
    })?;
    tracing::debug!(tool = name, path = %found.display(), "found tool on PATH");
    Ok(found)
}
