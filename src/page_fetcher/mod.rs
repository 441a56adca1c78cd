//! Page fetching module
//!
//! This module defines the contract for retrieving page text from the source
//! site, along with an HTTP implementation and a caching decorator. Fetching
//! is the only suspension point in the whole pipeline; everything downstream
//! of it operates on plain strings.

mod cached;
mod http;

pub use cached::CachedPageFetcher;
pub use http::HttpPageFetcher;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be performed at all
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The server answered 200 but served its known error page
    #[error("Received an error page from {url}")]
    ErrorPage { url: String },
}

/// Trait for retrieving the text of a page by URL
///
/// Implementors return the full page body as a string, or a `FetchError`
/// when the page cannot be retrieved intact. A failed fetch must never be
/// cached or parsed.
#[async_trait]
pub trait PageFetcher {
    /// Fetches the page at the given URL and returns its text
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}
