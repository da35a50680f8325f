// components/musicbrainz_client/src/types.rs
//! Response bodies of the MusicBrainz and Cover Art Archive APIs.
//!
//! Only the fields the converter reads are modelled; everything is
//! defaulted because the API omits empty values.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Release {
    pub id: String,
    pub title: String,
    pub status: Option<String>,
    pub date: Option<String>,
    pub country: Option<String>,
    pub barcode: Option<String>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Vec<ArtistCredit>,
    #[serde(rename = "label-info")]
    pub label_info: Vec<LabelInfo>,
    pub media: Vec<Medium>,
    #[serde(rename = "release-group")]
    pub release_group: Option<ReleaseGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistCredit {
    /// Credited name, may differ from the artist's own name
    pub name: String,
    pub artist: Artist,
    pub joinphrase: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelInfo {
    #[serde(rename = "catalog-number")]
    pub catalog_number: Option<String>,
    pub label: Option<Label>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: String,
    pub name: String,
}

/// A disc or other medium of a release
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Medium {
    pub position: u32,
    pub format: Option<String>,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Track {
    pub id: String,
    pub number: String,
    pub title: String,
    /// Milliseconds
    pub length: Option<u64>,
    pub position: u32,
    pub recording: Option<Recording>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Recording {
    pub id: String,
    pub title: String,
    pub length: Option<u64>,
    pub isrcs: Vec<String>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Vec<ArtistCredit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseGroup {
    pub id: String,
    pub title: String,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub releases: Vec<Release>,
    pub count: u32,
    pub offset: u32,
}

/// Cover Art Archive listing for a release
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoverArt {
    pub images: Vec<CoverArtImage>,
    pub release: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoverArtImage {
    pub image: String,
    pub thumbnails: Thumbnails,
    pub front: bool,
    pub back: bool,
    pub types: Vec<String>,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub small: Option<String>,
    pub large: Option<String>,
    #[serde(rename = "250")]
    pub size_250: Option<String>,
    #[serde(rename = "500")]
    pub size_500: Option<String>,
    #[serde(rename = "1200")]
    pub size_1200: Option<String>,
}

impl CoverArtImage {
    /// Largest thumbnail worth embedding, else the full image
    pub fn best_url(&self) -> &str {
        [&self.thumbnails.size_1200, &self.thumbnails.size_500]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
            .unwrap_or(self.image.as_str())
    }
}

impl CoverArt {
    /// URL of the front cover, or of the first image when none is marked
    /// as front
    pub fn front_url(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.front)
            .or_else(|| self.images.first())
            .map(CoverArtImage::best_url)
            .filter(|url| !url.is_empty())
    }
}
