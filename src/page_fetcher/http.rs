//! HTTP page fetcher implementation
use super::{FetchError, PageFetcher};
use async_trait::async_trait;

// The source site serves different (and sometimes empty) markup to unknown
// clients, so we need to spoof some browser information in order to get the
// correct responses.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

// Sentinel text on the "something went wrong" page the site returns with a
// 200 status. Such a body must be rejected before anyone caches or parses it.
const ERROR_PAGE_MARKER: &str = "Houston, we have a problem";

/// Page fetcher backed by an HTTP client
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Creates a new HTTP page fetcher
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects response bodies that are a disguised error page
fn validate_page_text(url: &str, text: &str) -> Result<(), FetchError> {
    if text.contains(ERROR_PAGE_MARKER) {
        return Err(FetchError::ErrorPage {
            url: url.to_string(),
        });
    }

    Ok(())
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header("user-agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let text = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

        validate_page_text(url, &text)?;

        Ok(text)
    }
}
