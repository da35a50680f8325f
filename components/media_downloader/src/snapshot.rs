// components/media_downloader/src/snapshot.rs
use crate::types::DownloadError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Relative paths of the matching files found under a directory
pub type FileSet = HashSet<PathBuf>;

/// Collect every non-directory entry below `dir`, symlinks included, whose
/// extension matches `extension` case-insensitively. Paths are relative
/// to `dir`.
pub fn snapshot(dir: &Path, extension: &str) -> Result<FileSet, DownloadError> {
    let target = extension.trim().trim_start_matches('.').to_lowercase();
    let mut files = FileSet::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|source| DownloadError::Scan {
            dir: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() || target.is_empty() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&target));
        if !matches {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.insert(relative.to_path_buf());
        }
    }

    Ok(files)
}

/// Files present in `after` but not in `before`, sorted
pub fn diff(before: &FileSet, after: &FileSet) -> Vec<PathBuf> {
    let mut new_files: Vec<PathBuf> = after.difference(before).cloned().collect();
    new_files.sort();
    new_files
}
