// components/musicbrainz_client/src/converter.rs
use crate::types::{ArtistCredit, Release};
use media_downloader::{AlbumMetadata, ReleaseMetadata, TrackMetadata};

/// Credited artist names joined with their join phrases
pub fn artist_name(credits: &[ArtistCredit]) -> String {
    credits
        .iter()
        .map(|credit| {
            let name = if credit.name.is_empty() {
                &credit.artist.name
            } else {
                &credit.name
            };
            format!("{}{}", name, credit.joinphrase)
        })
        .collect()
}

/// `m:ss` for a length in milliseconds
pub fn format_duration(ms: u64) -> Option<String> {
    if ms == 0 {
        return None;
    }
    let seconds = ms / 1000;
    Some(format!("{}:{:02}", seconds / 60, seconds % 60))
}

/// Year part of a `YYYY-MM-DD`, `YYYY-MM` or `YYYY` date
pub fn extract_year(date: &str) -> &str {
    date.get(..4).unwrap_or(date)
}

fn present(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Album and per-track tags of a release. Positions run across all discs.
pub fn to_release_metadata(release: &Release, cover_url: Option<String>) -> ReleaseMetadata {
    let artist = artist_name(&release.artist_credit);
    let label_info = release.label_info.first();
    let total_tracks: usize = release.media.iter().map(|m| m.tracks.len()).sum();
    let total_discs = release.media.len() as u32;

    let album = AlbumMetadata {
        title: present(&release.title),
        artist: present(&artist),
        album_artist: present(&artist),
        year: release
            .date
            .as_deref()
            .map(extract_year)
            .and_then(present),
        genre: None,
        label: label_info
            .and_then(|info| info.label.as_ref())
            .and_then(|label| present(&label.name)),
        catalog_number: label_info
            .and_then(|info| info.catalog_number.as_deref())
            .and_then(present),
        country: release.country.as_deref().and_then(present),
        comment: None,
        total_tracks: Some(total_tracks as u32).filter(|n| *n > 0),
        cover: cover_url.filter(|url| !url.is_empty()),
    };

    let mut tracks = Vec::with_capacity(total_tracks);
    for (disc_index, medium) in release.media.iter().enumerate() {
        for track in &medium.tracks {
            let mut meta = TrackMetadata {
                position: Some(tracks.len() as u32 + 1),
                title: present(&track.title),
                duration: track.length.and_then(format_duration),
                ..Default::default()
            };

            if total_discs > 1 {
                meta.disc_number = Some(disc_index as u32 + 1);
                meta.total_discs = Some(total_discs);
            }

            if let Some(recording) = &track.recording {
                if let Some(title) = present(&recording.title) {
                    meta.title = Some(title);
                }
                meta.isrc = recording.isrcs.first().and_then(|isrc| present(isrc));

                let track_artist = artist_name(&recording.artist_credit);
                if !track_artist.is_empty() && track_artist != artist {
                    meta.artist = Some(track_artist);
                }
            }

            tracks.push(meta);
        }
    }

    ReleaseMetadata { album, tracks }
}
