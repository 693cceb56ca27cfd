use feed_rs::parser::ParseFeedError;

use crate::DbError;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Could not fetch the feed: {0}")]
    GetError(#[from] reqwest_middleware::Error),
    #[error("Error while reading response: {0}")]
    ReadError(#[from] reqwest::Error),
    #[error("HTTP status code error: Upstream feed returned HTTP status code {0}")]
    StatusCodeError(u16),
    #[error("Parsing error: {0}")]
    ParseError(#[from] ParseFeedError),
}

/// An entry that can't become an article, even after every fallback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryMappingError {
    #[error("Entry has no link to identify it")]
    MissingUrl,
}

/// Failure of a whole source. Whatever was staged for the source is rolled back.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("Feed error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Database error: {0}")]
    Store(#[from] DbError),
}

#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("Article store is unavailable: {0}")]
    StoreUnavailable(#[source] DbError),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Could not read sources file {path}: {source}")]
    SourcesFile {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not parse sources: {0}")]
    SourcesFormat(#[from] serde_json::Error),
    #[error("At least one feed source must be configured")]
    NoSources,
    #[error("Rate limiting fill rate and bucket size must be greater than zero")]
    InvalidRateLimiting,
}
