use clap::Parser;
use nfogen::{GeneratedResult, ProgressEvent, generate_sidecars};
use std::fs;
use std::path::PathBuf;
use std::process;

/// Scrape IMDb episode metadata and generate NFO sidecar files
#[derive(Parser)]
#[command(name = "nfogen", version, about)]
struct Cli {
    /// IMDb title id of the show in the directory (e.g. tt0903747)
    imdb_id: String,

    /// Root directory to scan for video files
    root: PathBuf,

    /// Overwrite NFO files that already exist
    #[arg(long)]
    force: bool,
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::ScrapingShow { imdb_id } => {
            println!("Scraping show {imdb_id}...");
        }
        ProgressEvent::ShowAssembled {
            title,
            season_count,
        } => {
            println!("Found {season_count} season(s) for '{title}'");
        }
        ProgressEvent::GeneratingNfos => {
            println!("Generating NFO files...");
        }
        ProgressEvent::ScanningDirectory { root } => {
            println!("Scanning directory {}...", root.display());
        }
        ProgressEvent::FilesFound { count } => {
            println!("Found {count} files total");
        }
        ProgressEvent::MatchesFound { count } => {
            println!("Found {count} matches");
        }
    }
}

/// Writes each generated sidecar next to its video file
///
/// Existing files are preserved unless `force` is set.
fn write_results(results: &[GeneratedResult], force: bool) {
    let mut written = 0;

    for result in results {
        if !force && result.path.exists() {
            continue;
        }

        let name = result
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| result.path.display().to_string());
        println!("Writing {name}...");

        if let Err(e) = fs::write(&result.path, &result.nfo) {
            eprintln!("Error: failed to write {}: {}", result.path.display(), e);
            process::exit(1);
        }

        written += 1;
    }

    println!("Wrote {written} NFO file(s).");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Check if the root directory exists before doing any network work
    if !cli.root.is_dir() {
        eprintln!("Error: not a directory: {}", cli.root.display());
        process::exit(1);
    }

    match generate_sidecars(&cli.imdb_id, &cli.root, handle_progress_event).await {
        Ok(results) => write_results(&results, cli.force),
        Err(e) => {
            eprintln!("\nError: {e}");
            process::exit(1);
        }
    }
}
