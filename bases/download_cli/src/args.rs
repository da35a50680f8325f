// bases/download_cli/src/args.rs
use clap::Parser;
use media_downloader::{AlbumMetadata, FlatMetadata};
use std::path::PathBuf;

/// Download audio with yt-dlp and tag it with ffmpeg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video or playlist URL, required unless --config is given
    pub url: Option<String>,

    /// Directory to store downloaded files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Cover image, a local path or an http(s) URL
    #[arg(long)]
    pub cover: Option<String>,

    /// Audio format to extract
    #[arg(long, default_value = media_downloader::DEFAULT_AUDIO_FORMAT)]
    pub format: String,

    /// yt-dlp executable, looked up on PATH when omitted
    #[arg(long)]
    pub yt_dlp_path: Option<PathBuf>,

    /// ffmpeg executable, looked up on PATH when omitted
    #[arg(long)]
    pub ffmpeg_path: Option<PathBuf>,

    #[command(flatten)]
    pub tags: TagArgs,

    /// YAML file describing a batch of albums
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fetch tags for this MusicBrainz release id
    #[arg(long)]
    pub musicbrainz_id: Option<String>,

    /// Search MusicBrainz for "Artist - Album" and tag with the best match
    #[arg(long, value_name = "QUERY")]
    pub auto_fetch_metadata: Option<String>,

    /// Print an example batch config and exit
    #[arg(long)]
    pub example_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Tags written to every downloaded file
#[derive(clap::Args, Debug, Default, Clone)]
pub struct TagArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    #[arg(long)]
    pub album: Option<String>,

    #[arg(long)]
    pub album_artist: Option<String>,

    #[arg(long)]
    pub composer: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Track number, e.g. "3" or "3/12"
    #[arg(long)]
    pub track: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,
}

impl TagArgs {
    pub fn to_flat(&self) -> FlatMetadata {
        FlatMetadata {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            album_artist: self.album_artist.clone(),
            composer: self.composer.clone(),
            year: self.year.clone(),
            genre: self.genre.clone(),
            track: self.track.clone(),
            comment: self.comment.clone(),
        }
    }

    /// Album-level flags, used to override looked-up release data
    pub fn album_overrides(&self) -> AlbumMetadata {
        AlbumMetadata {
            title: self.album.clone(),
            artist: self.artist.clone(),
            album_artist: self.album_artist.clone(),
            year: self.year.clone(),
            genre: self.genre.clone(),
            comment: self.comment.clone(),
            ..Default::default()
        }
    }
}

impl Args {
    pub fn wants_musicbrainz(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.musicbrainz_id) || set(&self.auto_fetch_metadata)
    }
}
