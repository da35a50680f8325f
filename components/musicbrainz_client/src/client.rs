// components/musicbrainz_client/src/client.rs
use crate::converter::to_release_metadata;
use crate::error::{MusicBrainzError, Result};
use crate::types::{CoverArt, Release, SearchResult};
use media_downloader::ReleaseMetadata;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use url::Url;

pub const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
pub const COVER_ART_BASE_URL: &str = "https://coverartarchive.org";
const USER_AGENT: &str = concat!(
    "download-cli/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/your-org/mdma)"
);
const RATE_LIMIT: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RELEASE_INCLUDES: &str = "artist-credits labels recordings release-groups isrcs";
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// MusicBrainz API client.
///
/// Requests are spaced at least one second apart, as the API asks of
/// anonymous clients. The spacing is tracked per client value.
pub struct MusicBrainzClient {
    http: reqwest::Client,
    api_base: String,
    cover_art_base: String,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl MusicBrainzClient {
    pub fn new() -> Result<Self> {
        Self::with_base_urls(MUSICBRAINZ_BASE_URL, COVER_ART_BASE_URL)
    }

    pub fn with_base_urls(api_base: &str, cover_art_base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MusicBrainzError::HttpClient)?;

        Ok(Self::with_http_client(http, api_base, cover_art_base))
    }

    pub fn with_http_client(http: reqwest::Client, api_base: &str, cover_art_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            cover_art_base: cover_art_base.trim_end_matches('/').to_string(),
            min_interval: RATE_LIMIT,
            last_request: None,
        }
    }

    /// Override the minimum spacing between requests
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    async fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("rate limiting: waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base).map_err(|_| MusicBrainzError::InvalidUrl(base.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| MusicBrainzError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &mut self,
        url: Url,
        query: &[(&str, &str)],
        what: &'static str,
    ) -> Result<T> {
        self.throttle().await;
        tracing::debug!(url = %url, ?query, "querying {}", what);

        let request_error = |source| MusicBrainzError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .http
            .get(url.clone())
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MusicBrainzError::NotFound);
        }
        if status.as_u16() >= 400 {
            return Err(MusicBrainzError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| MusicBrainzError::Parse { what, source })
    }

    /// Full release with artists, labels, recordings and ISRCs
    pub async fn release(&mut self, id: &str) -> Result<Release> {
        let url = Self::endpoint(&self.api_base, &["release", id])?;
        self.get_json(url, &[("inc", RELEASE_INCLUDES), ("fmt", "json")], "release")
            .await
    }

    /// Lucene search, e.g. `artist:"Name" AND release:"Album"`.
    /// A limit of 0 means the default of 10.
    pub async fn search_releases(&mut self, query: &str, limit: usize) -> Result<SearchResult> {
        let limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };
        let limit = limit.to_string();
        let url = Self::endpoint(&self.api_base, &["release"])?;
        self.get_json(
            url,
            &[("query", query), ("limit", &limit), ("fmt", "json")],
            "search results",
        )
        .await
    }

    pub async fn search_by_artist_and_album(
        &mut self,
        artist: &str,
        album: &str,
    ) -> Result<SearchResult> {
        let query = format!("artist:{:?} AND release:{:?}", artist, album);
        self.search_releases(&query, DEFAULT_SEARCH_LIMIT).await
    }

    /// Search with `"Artist - Album"` text; anything else is searched as is
    pub async fn auto_search(&mut self, text: &str) -> Result<SearchResult> {
        match text.split_once(" - ") {
            Some((artist, album)) => {
                self.search_by_artist_and_album(artist.trim(), album.trim())
                    .await
            }
            None => self.search_releases(text, DEFAULT_SEARCH_LIMIT).await,
        }
    }

    pub async fn cover_art(&mut self, release_id: &str) -> Result<CoverArt> {
        let url = Self::endpoint(&self.cover_art_base, &["release", release_id])?;
        self.get_json(url, &[], "cover art").await
    }

    pub async fn front_cover_url(&mut self, release_id: &str) -> Result<String> {
        let art = self.cover_art(release_id).await?;
        art.front_url()
            .map(str::to_owned)
            .ok_or(MusicBrainzError::NotFound)
    }

    /// Look a release up by id, or search for it and take the best hit,
    /// and convert it into tags. A missing cover is not an error.
    pub async fn resolve_release(
        &mut self,
        id: Option<&str>,
        query: Option<&str>,
    ) -> Result<ReleaseMetadata> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let query = query.map(str::trim).filter(|s| !s.is_empty());

        let release = match (id, query) {
            (Some(id), _) => self.release(id).await?,
            (None, Some(query)) => {
                let results = self.auto_search(query).await?;
                let best = results
                    .releases
                    .first()
                    .ok_or_else(|| MusicBrainzError::NoReleases(query.to_string()))?;
                tracing::info!(id = %best.id, title = %best.title, "best search match");
                self.release(&best.id).await?
            }
            (None, None) => return Err(MusicBrainzError::MissingLookup),
        };

        let cover_url = match self.front_cover_url(&release.id).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("no cover art for {}: {}", release.id, e);
                None
            }
        };

        Ok(to_release_metadata(&release, cover_url))
    }
}
