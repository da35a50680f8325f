// components/musicbrainz_client/src/lib.rs
mod client;
mod converter;
mod error;
mod types;

pub use client::{MusicBrainzClient, COVER_ART_BASE_URL, MUSICBRAINZ_BASE_URL};
pub use converter::{artist_name, extract_year, format_duration, to_release_metadata};
pub use error::{MusicBrainzError, Result};
pub use types::{
    Artist, ArtistCredit, CoverArt, CoverArtImage, Label, LabelInfo, Medium, Recording, Release,
    ReleaseGroup, SearchResult, Thumbnails, Track,
};
