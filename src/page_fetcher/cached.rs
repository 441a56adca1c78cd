//! Cached page fetcher implementation
//!
//! This module provides a caching wrapper for page fetchers that
//! automatically stores and retrieves page text from a local cache.

use super::{FetchError, PageFetcher};
use crate::page_cache::{PageCache, cache_key};
use async_trait::async_trait;

/// A caching wrapper for page fetchers
///
/// This fetcher wraps another page fetcher and caches the results to avoid
/// redundant network requests. The cache is persistent across application
/// runs and has no expiry, so repeated runs against the same show reuse the
/// pages fetched the first time.
pub struct CachedPageFetcher<F, C>
where
    F: PageFetcher,
    C: PageCache,
{
    /// The underlying page fetcher
    fetcher: F,
    /// Cache storage for page text
    cache: C,
}

impl<F, C> CachedPageFetcher<F, C>
where
    F: PageFetcher,
    C: PageCache,
{
    /// Creates a new cached page fetcher wrapping the given fetcher
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let http = HttpPageFetcher::new();
    /// let cache = DiskPageCache::open()?;
    /// let fetcher = CachedPageFetcher::new(http, cache);
    /// ```
    pub fn new(fetcher: F, cache: C) -> Self {
        Self { fetcher, cache }
    }
}

#[async_trait]
impl<F, C> PageFetcher for CachedPageFetcher<F, C>
where
    F: PageFetcher + Sync,
    C: PageCache + Sync,
{
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let key = cache_key(url);

        // Try to load from cache
        match self.cache.load(&key) {
            Ok(Some(text)) => {
                // Cache hit - return cached text
                return Ok(text);
            }
            Ok(None) => {
                // Cache miss - continue to fetch from the fetcher
            }
            Err(_) => {
                // Cache read error - continue to fetch from the fetcher.
                // We don't want cache failures to prevent page retrieval.
            }
        }

        // Fetch from the underlying fetcher. Failed fetches propagate here
        // and are therefore never written to the cache.
        let text = self.fetcher.fetch_page(url).await?;

        // Store in cache (ignore errors to avoid failing the request)
        let _ = self.cache.store(&key, &text);

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_cache::MemoryPageCache;
    use std::sync::Mutex;

    /// Fetcher stub that counts calls and optionally always fails
    struct StubFetcher {
        text: Option<String>,
        calls: Mutex<usize>,
    }

    impl StubFetcher {
        fn serving(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                text: None,
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.text.clone().ok_or(FetchError::ErrorPage {
                url: url.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let fetcher = CachedPageFetcher::new(StubFetcher::serving("<html/>"), MemoryPageCache::new());

        let first = fetcher.fetch_page("https://example.com/page").await.unwrap();
        let second = fetcher.fetch_page("https://example.com/page").await.unwrap();

        assert_eq!(first, "<html/>");
        assert_eq!(second, "<html/>");
        assert_eq!(fetcher.fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_distinct_urls_are_cached_separately() {
        let fetcher = CachedPageFetcher::new(StubFetcher::serving("<html/>"), MemoryPageCache::new());

        fetcher.fetch_page("https://example.com/a").await.unwrap();
        fetcher.fetch_page("https://example.com/b").await.unwrap();

        assert_eq!(fetcher.fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_keys_are_stable_across_instances() {
        let cache = MemoryPageCache::new();

        {
            let fetcher = CachedPageFetcher::new(StubFetcher::serving("cached text"), &cache);
            fetcher.fetch_page("https://example.com/page").await.unwrap();
        }

        // A fresh fetcher over the same cache must find the entry even though
        // its inner fetcher can no longer produce the page.
        let fetcher = CachedPageFetcher::new(StubFetcher::failing(), &cache);
        let text = fetcher.fetch_page("https://example.com/page").await.unwrap();

        assert_eq!(text, "cached text");
    }

    #[tokio::test]
    async fn test_failed_fetches_are_not_cached() {
        let cache = MemoryPageCache::new();

        {
            let fetcher = CachedPageFetcher::new(StubFetcher::failing(), &cache);
            assert!(fetcher.fetch_page("https://example.com/page").await.is_err());
        }

        let fetcher = CachedPageFetcher::new(StubFetcher::serving("live"), &cache);
        let text = fetcher.fetch_page("https://example.com/page").await.unwrap();

        // The earlier failure must not have left a cache entry behind
        assert_eq!(text, "live");
    }
}
