//! NFO document generation
//!
//! This module maps an assembled [`Show`] and one of its episodes into the
//! XML sidecar document consumed by media-library software. Generation is a
//! pure function of its inputs: the same show and episode always produce
//! byte-identical output.
//!
//! See https://kodi.wiki/view/NFO_files/Templates

use crate::scraping::{SeasonEpisode, Show};

/// An NFO document addressed by its (season, episode) pair
///
/// Produced for every episode of a show, independent of whether a local
/// file exists for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowNfo {
    /// Season number
    pub season: u32,
    /// Episode number
    pub episode: u32,
    /// The complete NFO document text
    pub nfo: String,
}

/// Escapes XML special characters in text content
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Appends one indented element with escaped text content
fn push_element(nfo: &mut String, name: &str, value: &str) {
    nfo.push_str(&format!("  <{name}>{}</{name}>\n", escape_xml(value)));
}

/// Generates the NFO document for one episode of a show
///
/// Optional fields without a value are left out of the document entirely.
/// The `role` and `thumb` elements of an actor block are the exception:
/// they are emitted even when empty, since dropping them would misalign the
/// cast block structure the consuming software expects.
pub fn generate_nfo(show: &Show, episode: &SeasonEpisode) -> String {
    let detail = &episode.detail;
    let mut nfo = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    nfo.push_str("<tvshow>\n");

    push_element(&mut nfo, "title", &detail.title);
    push_element(&mut nfo, "originaltitle", &detail.title);
    push_element(&mut nfo, "showtitle", &show.title);

    nfo.push_str(&format!("  <season>{}</season>\n", episode.season));
    nfo.push_str(&format!(
        "  <namedseason number=\"{0}\">Season {0}</namedseason>\n",
        episode.season
    ));
    nfo.push_str(&format!("  <episode>{}</episode>\n", episode.episode));

    if let Some(description) = &detail.description {
        push_element(&mut nfo, "plot", description);
    }
    if let Some(runtime) = detail.runtime {
        nfo.push_str(&format!("  <runtime>{runtime}</runtime>\n"));
    }
    if let Some(air_date) = &detail.air_date {
        push_element(&mut nfo, "aired", air_date);
        // The year is the leading component of the air date
        let year = air_date.split('-').next().unwrap_or(air_date);
        push_element(&mut nfo, "year", year);
    }

    nfo.push_str(&format!(
        "  <uniqueid type=\"imdb\">{}</uniqueid>\n",
        escape_xml(&episode.id)
    ));

    if let Some(content_rating) = &detail.content_rating {
        push_element(&mut nfo, "mpaa", content_rating);
    }

    for genre in &show.genres {
        push_element(&mut nfo, "genre", genre);
    }

    for thumbnail in &detail.thumbnails {
        nfo.push_str(&format!(
            "  <thumb spoof=\"\" cache=\"\">{}</thumb>\n",
            escape_xml(thumbnail)
        ));
    }

    for (order, casting) in detail.cast.iter().enumerate() {
        nfo.push_str("  <actor>\n");
        nfo.push_str(&format!("    <name>{}</name>\n", escape_xml(&casting.actor)));
        match &casting.character {
            Some(character) => {
                nfo.push_str(&format!("    <role>{}</role>\n", escape_xml(character)));
            }
            None => nfo.push_str("    <role/>\n"),
        }
        match &casting.thumbnail {
            Some(thumbnail) => {
                nfo.push_str(&format!("    <thumb>{}</thumb>\n", escape_xml(thumbnail)));
            }
            None => nfo.push_str("    <thumb/>\n"),
        }
        nfo.push_str(&format!("    <order>{order}</order>\n"));
        nfo.push_str("  </actor>\n");
    }

    if let Some(rating) = detail.rating {
        nfo.push_str("  <ratings>\n");
        nfo.push_str("    <rating name=\"imdb\" max=\"10\" default=\"true\">\n");
        nfo.push_str(&format!("      <value>{rating}</value>\n"));
        nfo.push_str("    </rating>\n");
        nfo.push_str("  </ratings>\n");
    }

    nfo.push_str("</tvshow>\n");
    nfo
}

/// Generates the NFO documents for every episode of a show
///
/// Output is ordered by season, then by the episode order within each
/// season's list.
pub fn generate_all_nfos(show: &Show) -> Vec<ShowNfo> {
    show.seasons
        .iter()
        .flat_map(|season| {
            season.episodes.iter().map(|episode| ShowNfo {
                season: episode.season,
                episode: episode.episode,
                nfo: generate_nfo(show, episode),
            })
        })
        .collect()
}
