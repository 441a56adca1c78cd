//! Page cache storage module
//!
//! This module provides persistent caching of fetched page text using the
//! system's standard cache directory. Entries are plain text blobs stored
//! one file per key, with no expiry: a cached page is reused until the
//! operator clears the cache directory out of band.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read cached data
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write cached data
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A key→text blob store used to cache fetched pages
///
/// Implementations must treat keys as opaque identifiers. The disk-backed
/// implementation is used in production; an in-memory implementation is
/// provided for tests and other short-lived usage.
pub trait PageCache {
    /// Loads the cached text for the given key, or `None` on a cache miss
    fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores text under the given key, replacing any previous entry
    fn store(&self, key: &str, text: &str) -> Result<(), CacheError>;
}

impl<C: PageCache + ?Sized> PageCache for &C {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, text: &str) -> Result<(), CacheError> {
        (**self).store(key, text)
    }
}

/// Persistent page cache backed by the system cache directory
///
/// Each entry is stored as a single file named after its key. Writes for
/// distinct keys are independent, so concurrent fetches of different URLs
/// need no coordination.
pub struct DiskPageCache {
    /// The directory where cached pages are stored
    cache_dir: PathBuf,
}

impl DiskPageCache {
    /// Opens or creates the page cache in the system's standard cache directory
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache = DiskPageCache::open()?;
    /// cache.store("d74981...", "<html>...</html>")?;
    /// ```
    pub fn open() -> Result<Self, CacheError> {
        let proj_dirs =
            ProjectDirs::from("", "", "nfogen").ok_or(CacheError::CacheDirectoryNotFound)?;

        Self::at(proj_dirs.cache_dir().join("pages"))
    }

    /// Opens or creates the page cache at an explicit directory
    pub fn at(cache_dir: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
            path: cache_dir.clone(),
            source: e,
        })?;

        Ok(Self { cache_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(key)
    }
}

impl PageCache for DiskPageCache {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let file_path = self.file_path(key);

        // If file doesn't exist, return None
        if !file_path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&file_path).map_err(|e| CacheError::ReadFailed {
            path: file_path,
            source: e,
        })?;

        Ok(Some(text))
    }

    fn store(&self, key: &str, text: &str) -> Result<(), CacheError> {
        let file_path = self.file_path(key);

        fs::write(&file_path, text).map_err(|e| CacheError::WriteFailed {
            path: file_path,
            source: e,
        })
    }
}

/// In-memory page cache
///
/// Keeps entries in a `HashMap` behind a mutex. Useful for tests where the
/// disk-backed cache would leak state between runs.
#[derive(Default)]
pub struct MemoryPageCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPageCache {
    /// Creates an empty in-memory cache
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageCache for MemoryPageCache {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, text: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

/// Returns the canonical cache key for a URL
///
/// Keys are the hex BLAKE3 hash of the URL, so they are stable across runs
/// and safe to use as file names.
pub(crate) fn cache_key(url: &str) -> String {
    blake3::hash(url.as_bytes()).to_hex().to_string()
}
