//! File matching module
//!
//! This module scans a directory tree for video files, parses season and
//! episode numbers out of their names, and pairs each file with the NFO
//! document generated for that (season, episode). Files whose names carry
//! no parseable pair, or whose pair has no generated NFO, are simply not
//! candidates for metadata generation and are dropped without error.

use crate::nfo_generator::ShowNfo;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Video file extensions considered by the directory scan
pub const VIDEO_EXTENSIONS: &[&str] = &["avi", "mpeg", "mpg", "mkv", "mov"];

/// Extension of the generated sidecar files
const SIDECAR_EXTENSION: &str = "nfo";

/// Errors that can occur while scanning for video files
#[derive(Debug, Error)]
pub enum FileMatcherError {
    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to read directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read directory entry
    #[error("Failed to read directory entry: {0}")]
    ReadEntryFailed(#[from] io::Error),
}

/// A resolved pairing of an output file path and an NFO document body
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResult {
    /// Where the sidecar belongs: the video file's path with its extension
    /// replaced by `nfo`
    pub path: PathBuf,
    /// The NFO document to write there
    pub nfo: String,
}

/// Scans a directory recursively for video files
///
/// Files are selected by their extension, compared case-insensitively
/// against [`VIDEO_EXTENSIONS`].
pub fn scan_for_videos(root: &Path) -> Result<Vec<PathBuf>, FileMatcherError> {
    let mut videos = Vec::new();
    scan_directory_recursive(root, &mut videos)?;
    Ok(videos)
}

/// Recursively scans a directory and collects video file paths
fn scan_directory_recursive(
    dir_path: &Path,
    videos: &mut Vec<PathBuf>,
) -> Result<(), FileMatcherError> {
    if !dir_path.is_dir() {
        return Err(FileMatcherError::NotADirectory(dir_path.to_path_buf()));
    }

    for entry in fs::read_dir(dir_path).map_err(|e| FileMatcherError::ReadDirectoryFailed {
        path: dir_path.to_path_buf(),
        source: e,
    })? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, videos)?;
        } else if path.is_file() && is_video_file(&path) {
            videos.push(path);
        }
    }

    Ok(())
}

/// Returns true when the path carries a recognized video extension
fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parses a (season, episode) pair out of a file path
///
/// Looks for `S<digits>E<digits>` (case-insensitive) anywhere in the path.
/// The two numbers are a pair: unless both parse, no pair is returned.
pub fn parse_season_episode(path: &Path) -> Option<(u32, u32)> {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)S(\d+)E(\d+)").expect("season/episode pattern is valid")
    });

    let name = path.to_string_lossy();
    let captures = PATTERN.captures(&name)?;
    let season = captures.get(1)?.as_str().parse().ok()?;
    let episode = captures.get(2)?.as_str().parse().ok()?;

    Some((season, episode))
}

/// Correlates video files with generated NFO documents
///
/// Each file with a parseable (season, episode) pair is matched against the
/// first NFO carrying the same pair, in the generator's season-then-episode
/// order. The result order follows the input file order.
pub fn match_files(files: &[PathBuf], nfos: &[ShowNfo]) -> Vec<GeneratedResult> {
    files
        .iter()
        .filter_map(|file| {
            let (season, episode) = parse_season_episode(file)?;
            let found = nfos
                .iter()
                .find(|nfo| nfo.season == season && nfo.episode == episode)?;

            Some(GeneratedResult {
                path: file.with_extension(SIDECAR_EXTENSION),
                nfo: found.nfo.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::File;

    fn nfo(season: u32, episode: u32, body: &str) -> ShowNfo {
        ShowNfo {
            season,
            episode,
            nfo: body.to_string(),
        }
    }

    #[test]
    fn test_parse_season_episode() {
        assert_eq!(
            parse_season_episode(Path::new("Show.Name.S02E05.mkv")),
            Some((2, 5))
        );
        assert_eq!(
            parse_season_episode(Path::new("show.name.s02e05.mkv")),
            Some((2, 5))
        );
        assert_eq!(parse_season_episode(Path::new("Show.Name.mkv")), None);
        // A missing digit group invalidates the whole pair
        assert_eq!(parse_season_episode(Path::new("S2E")), None);
    }

    #[test]
    fn test_match_files_end_to_end() {
        let files = vec![PathBuf::from("a.S01E02.mkv"), PathBuf::from("b.S01E03.mkv")];
        let nfos = vec![nfo(1, 1, "first"), nfo(1, 2, "second")];

        let results = match_files(&files, &nfos);

        // Only `a` matches: episode 3 was never generated
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, PathBuf::from("a.S01E02.nfo"));
        assert_eq!(results[0].nfo, "second");
    }

    #[test]
    fn test_match_files_is_idempotent() {
        let files = vec![PathBuf::from("a.S01E01.avi"), PathBuf::from("b.S01E02.mov")];
        let nfos = vec![nfo(1, 1, "one"), nfo(1, 2, "two")];

        let first = match_files(&files, &nfos);
        let second = match_files(&files, &nfos);

        assert_eq!(first, second);
    }

    #[test]
    fn test_match_files_first_pair_wins() {
        let files = vec![PathBuf::from("a.S01E01.mkv")];
        let nfos = vec![nfo(1, 1, "first"), nfo(1, 1, "duplicate")];

        let results = match_files(&files, &nfos);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].nfo, "first");
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mkv")));
        assert!(is_video_file(Path::new("a.MKV")));
        assert!(is_video_file(Path::new("a.mpeg")));
        assert!(!is_video_file(Path::new("a.srt")));
        assert!(!is_video_file(Path::new("a")));
    }

    #[test]
    fn test_scan_finds_videos_recursively() {
        let root = env::temp_dir().join("nfogen_test_scan");
        let nested = root.join("season1");
        fs::create_dir_all(&nested).unwrap();
        File::create(root.join("a.S01E01.mkv")).unwrap();
        File::create(nested.join("b.S01E02.MOV")).unwrap();
        File::create(nested.join("notes.txt")).unwrap();

        let mut found = scan_for_videos(&root).unwrap();
        found.sort();

        assert_eq!(
            found,
            vec![root.join("a.S01E01.mkv"), nested.join("b.S01E02.MOV")]
        );

        // Cleanup
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_scan_rejects_non_directories() {
        let result = scan_for_videos(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_err());
    }
}
