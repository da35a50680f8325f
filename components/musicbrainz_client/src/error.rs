use thiserror::Error;

#[derive(Error, Debug)]
pub enum MusicBrainzError {
    #[error("not found")]
    NotFound,

    #[error("API error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {what}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("no releases found for query: {0}")]
    NoReleases(String),

    #[error("either a release id or a search query is required")]
    MissingLookup,

    #[error("failed to initialise HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

impl MusicBrainzError {
    /// Lookups that simply found nothing, as opposed to failed requests
    pub fn is_not_found(&self) -> bool {
        matches!(self, MusicBrainzError::NotFound | MusicBrainzError::NoReleases(_))
    }
}

pub type Result<T> = std::result::Result<T, MusicBrainzError>;
