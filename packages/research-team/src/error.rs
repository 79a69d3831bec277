//! Typed errors for the research team library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on failure kinds; the CLI binary wraps these with `anyhow` context.

use thiserror::Error;

/// Errors from the web-search service.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP transport failed
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the search API
    #[error("search API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body could not be interpreted
    #[error("search response parse error: {0}")]
    Parse(String),
}

/// Errors from the page-scrape service.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP transport failed
    #[error("scrape request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the scrape API
    #[error("scrape API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Scrape reported success but carried no usable content
    #[error("no content returned for: {url}")]
    MissingContent { url: String },

    /// The provider rejected or could not process the URL
    #[error("scrape failed for: {url}")]
    Failed { url: String },
}

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
