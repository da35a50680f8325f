// components/media_downloader/src/ffmpeg.rs
use crate::metadata::FlatMetadata;
use crate::types::DownloadError;
use crate::utils::path_arg;
use std::path::Path;

/// Extension of the files yt-dlp writes when extracting `format`
pub fn extension_for(format: &str) -> &str {
    match format {
        "vorbis" => "ogg",
        "alac" => "m4a",
        other => other,
    }
}

/// Container ffmpeg must write; the `.tagged` temp name hides it
pub fn muxer_for(format: &str) -> &str {
    match format {
        "m4a" => "ipod",
        "aac" => "adts",
        other => other,
    }
}

/// Arguments that copy the audio of `input` into `output`, embedding the
/// tags and, when given, `cover` as an attached front picture.
pub fn build_tag_args(
    input: &Path,
    output: &Path,
    format: &str,
    meta: &FlatMetadata,
    cover: Option<&Path>,
) -> Result<Vec<String>, DownloadError> {
    let mut args = vec!["-y".to_string(), "-i".to_string(), path_arg(input)?];

    if let Some(cover) = cover {
        args.push("-i".to_string());
        args.push(path_arg(cover)?);
    }

    args.extend(["-map", "0:a"].map(String::from));
    if cover.is_some() {
        args.extend(
            [
                "-map",
                "1",
                "-c:a",
                "copy",
                "-c:v",
                "mjpeg",
                "-metadata:s:v",
                "title=Album cover",
                "-metadata:s:v",
                "comment=Cover (front)",
                "-disposition:v:0",
                "attached_pic",
            ]
            .map(String::from),
        );
    } else {
        args.extend(["-c", "copy"].map(String::from));
    }

    for (key, value) in meta.tag_pairs() {
        args.push("-metadata".to_string());
        args.push(format!("{}={}", key, value));
    }

    args.extend(["-id3v2_version", "3", "-f", muxer_for(format)].map(String::from));
    args.push(path_arg(output)?);
    Ok(args)
}
