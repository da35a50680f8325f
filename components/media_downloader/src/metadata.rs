// components/media_downloader/src/metadata.rs
use serde::{Deserialize, Serialize};

/// Album-scoped tags shared by every file of a release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub label: Option<String>,
    pub catalog_number: Option<String>,
    pub country: Option<String>,
    pub comment: Option<String>,

    /// Number of tracks on the release, `None` when unknown
    pub total_tracks: Option<u32>,

    /// Local path or URL of the front cover
    pub cover: Option<String>,
}

/// Per-track tags; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// 1-based position on the release
    pub position: Option<u32>,
    pub title: Option<String>,

    /// Duration as `m:ss`
    pub duration: Option<String>,

    /// Overrides the album artist for this track only
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub isrc: Option<String>,
    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,
    pub comment: Option<String>,
}

/// An album together with its ordered track list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub album: AlbumMetadata,
    pub tracks: Vec<TrackMetadata>,
}

fn overlay_field<T: Clone>(target: &mut Option<T>, value: &Option<T>, present: impl Fn(&T) -> bool) {
    if let Some(value) = value.as_ref().filter(|v| present(v)) {
        *target = Some(value.clone());
    }
}

fn overlay_text(target: &mut Option<String>, value: &Option<String>) {
    overlay_field(target, value, |v| !v.trim().is_empty());
}

fn overlay_number(target: &mut Option<u32>, value: &Option<u32>) {
    overlay_field(target, value, |v| *v > 0);
}

impl AlbumMetadata {
    /// Replace fields with every non-empty field of `overrides`
    pub fn overlay(&mut self, overrides: &AlbumMetadata) {
        overlay_text(&mut self.title, &overrides.title);
        overlay_text(&mut self.artist, &overrides.artist);
        overlay_text(&mut self.album_artist, &overrides.album_artist);
        overlay_text(&mut self.year, &overrides.year);
        overlay_text(&mut self.genre, &overrides.genre);
        overlay_text(&mut self.label, &overrides.label);
        overlay_text(&mut self.catalog_number, &overrides.catalog_number);
        overlay_text(&mut self.country, &overrides.country);
        overlay_text(&mut self.comment, &overrides.comment);
        overlay_number(&mut self.total_tracks, &overrides.total_tracks);
        overlay_text(&mut self.cover, &overrides.cover);
    }
}

impl TrackMetadata {
    /// Replace fields with every non-empty field of `overrides`
    pub fn overlay(&mut self, overrides: &TrackMetadata) {
        overlay_number(&mut self.position, &overrides.position);
        overlay_text(&mut self.title, &overrides.title);
        overlay_text(&mut self.duration, &overrides.duration);
        overlay_text(&mut self.artist, &overrides.artist);
        overlay_text(&mut self.composer, &overrides.composer);
        overlay_text(&mut self.isrc, &overrides.isrc);
        overlay_number(&mut self.disc_number, &overrides.disc_number);
        overlay_number(&mut self.total_discs, &overrides.total_discs);
        overlay_text(&mut self.comment, &overrides.comment);
    }
}

impl ReleaseMetadata {
    /// Apply per-track overrides keyed by position. Overrides for
    /// positions the release does not have are appended, and a known
    /// track total grows to cover them.
    pub fn overlay_tracks(&mut self, overrides: &[TrackMetadata]) {
        for (i, update) in overrides.iter().enumerate() {
            let position = update.position.filter(|p| *p > 0);
            let existing = match position {
                Some(position) => self.tracks.iter_mut().find(|t| t.position == Some(position)),
                None => self.tracks.get_mut(i),
            };
            match existing {
                Some(track) => track.overlay(update),
                None => self.tracks.push(update.clone()),
            }
        }
        self.tracks.sort_by_key(|t| t.position.unwrap_or(u32::MAX));

        let highest = self.tracks.iter().filter_map(|t| t.position).max();
        if let (Some(total), Some(highest)) = (self.album.total_tracks.as_mut(), highest) {
            *total = (*total).max(highest).max(self.tracks.len() as u32);
        }
    }

    /// Pick the track record for the `file_index`-th new file (0-based)
    /// whose recovered playlist position is `track_index` (1-based).
    pub fn track_for(&self, track_index: u32, file_index: usize) -> Option<&TrackMetadata> {
        (track_index as usize)
            .checked_sub(1)
            .and_then(|i| self.tracks.get(i))
            .or_else(|| self.tracks.get(file_index))
    }
}

/// The final key/value tag set written into one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub composer: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub track: Option<String>,
    pub comment: Option<String>,
}

impl FlatMetadata {
    /// Tagger key/value pairs for every non-empty field, in write order.
    /// `year` is written both as `year` and `date`.
    pub fn tag_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", &self.title),
            ("artist", &self.artist),
            ("album", &self.album),
            ("album_artist", &self.album_artist),
            ("composer", &self.composer),
            ("year", &self.year),
            ("date", &self.year),
            ("genre", &self.genre),
            ("track", &self.track),
            ("comment", &self.comment),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_empty(value).map(|value| (key, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_pairs().is_empty()
    }
}

/// Trimmed contents of an optional field, `None` when blank
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn owned(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_owned)
}

/// Merge album defaults with one track record.
///
/// Track-level artist, title, composer and comment win over the album when
/// non-empty. The track number uses the record's own position, or
/// `fallback_position` when the record has none, and includes the album
/// total when known.
pub fn merge(album: &AlbumMetadata, track: &TrackMetadata, fallback_position: u32) -> FlatMetadata {
    let position = track
        .position
        .filter(|p| *p > 0)
        .unwrap_or(fallback_position);

    FlatMetadata {
        title: owned(&track.title),
        artist: owned(&track.artist).or_else(|| owned(&album.artist)),
        album: owned(&album.title),
        album_artist: owned(&album.album_artist).or_else(|| owned(&album.artist)),
        composer: owned(&track.composer),
        year: owned(&album.year),
        genre: owned(&album.genre),
        track: format_track_number(position, album.total_tracks.unwrap_or(0)),
        comment: owned(&track.comment).or_else(|| owned(&album.comment)),
    }
}

/// `"n/total"` when the total is known, `"n"` otherwise
pub fn format_track_number(position: u32, total: u32) -> Option<String> {
    match (position, total) {
        (0, _) => None,
        (n, 0) => Some(n.to_string()),
        (n, total) => Some(format!("{}/{}", n, total)),
    }
}
