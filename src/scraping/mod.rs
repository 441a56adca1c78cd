//! Data structures and operations for scraping show metadata from IMDb pages.
//!
//! The extraction functions turn raw page text into the value types defined
//! here. The types form a one-directional composition without back-references
//! (a [`Show`] owns its [`Season`]s, a season owns its [`SeasonEpisode`]s),
//! so the whole graph is an immutable value once assembled.

mod extract;
mod structured_data;

pub use extract::{
    convert_duration, extract_episode_detail, extract_episode_list, extract_season_count,
    extract_show_summary,
};

use thiserror::Error;

/// Errors that can occur while extracting data from a page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page carries no embedded structured-data block
    #[error("No structured data block found in page")]
    StructuredDataMissing,

    /// The structured-data block is present but not valid JSON
    #[error("Failed to parse structured data block: {0}")]
    StructuredDataInvalid(#[from] serde_json::Error),

    /// An episode list entry has no extractable title id. Without an id the
    /// episode's detail page cannot be located, which indicates a structural
    /// change on the source site rather than a gap in the data.
    #[error("No title id found for an episode list entry")]
    MissingEpisodeId,
}

/// A complete show with all seasons and episodes
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    /// IMDb title id of the show (e.g. `tt0903747`)
    pub id: String,
    /// Show title
    pub title: String,
    /// Genre labels in source order (duplicates allowed as scraped)
    pub genres: Vec<String>,
    /// Seasons ordered 1..count
    pub seasons: Vec<Season>,
}

/// A single season of a show
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    /// The 1-based season number
    pub season: u32,
    /// Episodes in source list order
    pub episodes: Vec<SeasonEpisode>,
}

/// An episode placed within a season
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonEpisode {
    /// IMDb title id of the episode
    pub id: String,
    /// The season this episode belongs to
    pub season: u32,
    /// The episode number within the season; always definite after assembly
    pub episode: u32,
    /// Detail fields scraped from the episode's own page
    pub detail: Episode,
}

/// Detail fields of an episode
///
/// Everything except the title is optional: the source pages routinely omit
/// individual fields and a missing field is a valid state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Episode title
    pub title: String,
    /// Plot description
    pub description: Option<String>,
    /// Runtime in whole minutes
    pub runtime: Option<u32>,
    /// Content rating label (e.g. `TV-MA`)
    pub content_rating: Option<String>,
    /// Air date as scraped (ISO-like, e.g. `2008-01-20`)
    pub air_date: Option<String>,
    /// Aggregate rating value
    pub rating: Option<f64>,
    /// Cast in billing order
    pub cast: Vec<Casting>,
    /// Thumbnail URLs; in practice zero or one entry (the primary image)
    pub thumbnails: Vec<String>,
}

/// A cast member of an episode
#[derive(Debug, Clone, PartialEq)]
pub struct Casting {
    /// Actor name; empty when the cast item carries no name text
    pub actor: String,
    /// Character name
    pub character: Option<String>,
    /// Thumbnail URL of the actor headshot
    pub thumbnail: Option<String>,
}

/// Identifying fields of a show, extracted from its main page
#[derive(Debug, Clone, PartialEq)]
pub struct ShowSummary {
    /// IMDb title id of the show
    pub id: String,
    /// Show title
    pub title: String,
    /// Genre labels in source order
    pub genres: Vec<String>,
}

/// One entry of a season's episode list page
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeListEntry {
    /// IMDb title id of the episode
    pub id: String,
    /// Episode title as shown in the list
    pub title: String,
    /// Short description as shown in the list
    pub description: Option<String>,
    /// Explicit episode number, when the list provides one
    pub episode: Option<u32>,
}
