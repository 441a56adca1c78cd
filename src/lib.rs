//! nfogen - Generate NFO metadata sidecar files using file name patterns
//!
//! This library scrapes a TV show's episode metadata from IMDb, matches the
//! episodes against local video files by the `S<nn>E<nn>` convention in
//! their names, and produces one Kodi-style XML document per matched file.
//! Fetched pages are cached on disk, so repeated runs against the same show
//! stay off the network.

mod file_matcher;
mod nfo_generator;
mod page_cache;
mod page_fetcher;
mod scraping;
mod show_assembler;

// Re-export error types
pub use file_matcher::FileMatcherError;
pub use page_cache::CacheError;
pub use page_fetcher::FetchError;
pub use scraping::ScrapeError;
pub use show_assembler::AssemblyError;

// Re-export the pipeline building blocks
pub use file_matcher::{
    GeneratedResult, VIDEO_EXTENSIONS, match_files, parse_season_episode, scan_for_videos,
};
pub use nfo_generator::{ShowNfo, generate_all_nfos, generate_nfo};
pub use page_cache::{DiskPageCache, MemoryPageCache, PageCache};
pub use page_fetcher::{CachedPageFetcher, HttpPageFetcher, PageFetcher};
pub use scraping::{Casting, Episode, EpisodeListEntry, Season, SeasonEpisode, Show, ShowSummary};
pub use show_assembler::assemble_show;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Progress event emitted during a generation run
///
/// These events allow library users to track progress and provide feedback
/// while the pipeline runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scraping the show's pages
    ScrapingShow { imdb_id: String },

    /// The show graph is complete
    ShowAssembled { title: String, season_count: usize },

    /// Generating NFO documents for every episode
    GeneratingNfos,

    /// Scanning the root directory for video files
    ScanningDirectory { root: PathBuf },

    /// Video files found under the root directory
    FilesFound { count: usize },

    /// Files successfully paired with episode NFOs
    MatchesFound { count: usize },
}

/// Top-level error type for nfogen operations
#[derive(Debug, Error)]
pub enum NfoGenError {
    /// Error while opening the page cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error while assembling the show graph
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Error while scanning for video files
    #[error("File matching error: {0}")]
    FileMatcher(#[from] FileMatcherError),
}

/// Runs the full pipeline against IMDb with the standard disk page cache
///
/// Convenience wrapper around [`generate_sidecars_with`] that wires up the
/// HTTP fetcher and the persistent page cache.
///
/// # Arguments
///
/// * `imdb_id` - IMDb title id of the show (e.g. `tt0903747`)
/// * `root` - Directory to scan recursively for video files
/// * `progress_callback` - Closure called with progress events
pub async fn generate_sidecars<P>(
    imdb_id: &str,
    root: &Path,
    progress_callback: P,
) -> Result<Vec<GeneratedResult>, NfoGenError>
where
    P: FnMut(ProgressEvent),
{
    let cache = DiskPageCache::open()?;
    let fetcher = CachedPageFetcher::new(HttpPageFetcher::new(), cache);

    generate_sidecars_with(&fetcher, imdb_id, root, progress_callback).await
}

/// Runs the full pipeline with a caller-provided page fetcher
///
/// Scrapes and assembles the show, generates an NFO document for every
/// episode, scans `root` for video files, and pairs files with documents by
/// the (season, episode) numbers parsed from each file name. Files without
/// a parseable pair or without a generated counterpart are skipped; any
/// fetch or parse failure aborts the run with no results.
///
/// # Examples
///
/// ```no_run
/// use nfogen::{CachedPageFetcher, DiskPageCache, HttpPageFetcher, generate_sidecars_with};
/// use std::path::Path;
///
/// # async fn run() -> Result<(), nfogen::NfoGenError> {
/// let cache = DiskPageCache::open()?;
/// let fetcher = CachedPageFetcher::new(HttpPageFetcher::new(), cache);
///
/// let results = generate_sidecars_with(
///     &fetcher,
///     "tt0903747",
///     Path::new("/media/tv/breaking-bad"),
///     |_| {}, // Ignore all progress events
/// )
/// .await?;
///
/// for result in &results {
///     println!("{}", result.path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate_sidecars_with<F, P>(
    fetcher: &F,
    imdb_id: &str,
    root: &Path,
    mut progress_callback: P,
) -> Result<Vec<GeneratedResult>, NfoGenError>
where
    F: PageFetcher + Sync,
    P: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::ScrapingShow {
        imdb_id: imdb_id.to_string(),
    });

    let show = assemble_show(fetcher, imdb_id).await?;

    progress_callback(ProgressEvent::ShowAssembled {
        title: show.title.clone(),
        season_count: show.seasons.len(),
    });

    progress_callback(ProgressEvent::GeneratingNfos);
    let nfos = generate_all_nfos(&show);

    progress_callback(ProgressEvent::ScanningDirectory {
        root: root.to_path_buf(),
    });
    let files = scan_for_videos(root)?;

    progress_callback(ProgressEvent::FilesFound { count: files.len() });

    let results = match_files(&files, &nfos);

    progress_callback(ProgressEvent::MatchesFound {
        count: results.len(),
    });

    Ok(results)
}
