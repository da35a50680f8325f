// components/media_downloader/src/ytdlp.rs
use crate::types::DownloadError;
use crate::utils::path_arg;
use std::path::Path;

/// File name template; the playlist index prefix lets tracks be matched
/// back to their metadata after the download.
pub const OUTPUT_TEMPLATE: &str = "%(playlist_index|0)s - %(title)s.%(ext)s";

/// Arguments for an audio-only, best-quality download of `url` (video or
/// playlist) into `output_dir`. Failing playlist items are skipped.
pub fn build_download_args(
    url: &str,
    output_dir: &Path,
    format: &str,
    ffmpeg_location: Option<&Path>,
) -> Result<Vec<String>, DownloadError> {
    let template = path_arg(&output_dir.join(OUTPUT_TEMPLATE))?;

    let mut args: Vec<String> = [
        "--extract-audio",
        "--audio-format",
        format,
        "--audio-quality",
        "0",
        "--prefer-ffmpeg",
        "--yes-playlist",
        "--ignore-errors",
        "--no-continue",
        "--newline",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();

    if let Some(ffmpeg) = ffmpeg_location {
        args.push("--ffmpeg-location".to_string());
        args.push(path_arg(ffmpeg)?);
    }

    args.push("-o".to_string());
    args.push(template);
    args.push(url.to_string());
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_quality_and_playlist_index_template() {
        let args =
            build_download_args("https://example.com/video", Path::new("/output"), "mp3", None)
                .unwrap();
        let joined = args.join(" ");

        assert!(joined.contains("--audio-quality 0"), "args: {}", joined);
        assert!(joined.contains("--audio-format mp3"), "args: {}", joined);
        assert!(joined.contains("--yes-playlist"), "args: {}", joined);
        assert!(joined.contains("--ignore-errors"), "args: {}", joined);
        assert!(
            joined.contains("-o /output/%(playlist_index|0)s - %(title)s.%(ext)s"),
            "args: {}",
            joined
        );
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/video"));
    }

    #[test]
    fn test_ffmpeg_location_is_forwarded() {
        let args = build_download_args(
            "https://example.com/video",
            Path::new("/output"),
            "flac",
            Some(Path::new("/opt/ffmpeg/bin/ffmpeg")),
        )
        .unwrap();

        let position = args.iter().position(|a| a == "--ffmpeg-location").unwrap();
        assert_eq!(args[position + 1], "/opt/ffmpeg/bin/ffmpeg");
    }
}
