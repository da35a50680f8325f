// bases/download_cli/src/output.rs
use crate::config::AlbumConfig;
use media_downloader::{DownloadError, ReleaseMetadata};
use std::path::{Path, PathBuf};

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_download_start(&self, url: &str) {
        println!("Starting download from: {}", url);
    }

    pub fn print_album_header(&self, index: usize, total: usize, album: &AlbumConfig) {
        println!("\n[{}/{}] {}", index, total, album.display_name());
        if self.verbose {
            println!("URL: {}", album.url);
        }
    }

    pub fn print_release_found(&self, release: &ReleaseMetadata) {
        let album = &release.album;
        println!(
            "MusicBrainz: {} by {}",
            album.title.as_deref().unwrap_or("(untitled)"),
            album.artist.as_deref().unwrap_or("(unknown artist)")
        );
        if let Some(year) = &album.year {
            println!("Year: {}", year);
        }
        if self.verbose {
            for track in &release.tracks {
                println!(
                    "  {:>2}. {}",
                    track.position.unwrap_or_default(),
                    track.title.as_deref().unwrap_or("")
                );
            }
        }
    }

    pub fn print_lookup_failed(&self, error: &musicbrainz_client::MusicBrainzError) {
        println!("MusicBrainz lookup failed ({}), continuing without it", error);
    }

    pub fn print_download_complete(&self, dir: &Path, files: &[PathBuf]) {
        println!("Downloaded {} file(s) to {}", files.len(), dir.display());
        if self.verbose {
            for file in files {
                println!("  {}", file.display());
            }
        }
    }

    pub fn print_album_failed(&self, album: &AlbumConfig, error: &DownloadError) {
        eprintln!("Failed: {}: {}", album.display_name(), error);
        self.print_tagged_before_failure(error);
    }

    pub fn print_batch_summary(&self, total: usize, failed: &[String]) {
        println!(
            "\nBatch finished: {} of {} album(s) succeeded",
            total - failed.len(),
            total
        );
        for name in failed {
            println!("  failed: {}", name);
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if let Some(download_error) = error.downcast_ref::<DownloadError>() {
            self.print_tagged_before_failure(download_error);
        }

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }

    fn print_tagged_before_failure(&self, error: &DownloadError) {
        if let DownloadError::TaggingFailed { tagged, .. } = error {
            for file in tagged {
                eprintln!("  tagged: {}", file.display());
            }
        }
    }
}
