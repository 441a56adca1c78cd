//! Pure extraction operations over raw page text.
//!
//! Each operation parses a page into one normalized shape. A missing field
//! becomes `None` in its slot instead of failing the whole page. The two
//! hard failures are an absent or invalid structured data block and an
//! episode list entry without a title id; in both cases the rest of the
//! pipeline cannot do anything useful with the page.

use super::structured_data::StructuredData;
use super::{Casting, Episode, EpisodeListEntry, ScrapeError, ShowSummary};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Compiles a selector known to be valid
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Decodes HTML entities left in scraped text
fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Returns the entity-decoded text content of an element
fn element_text(element: ElementRef) -> String {
    decode(&element.text().collect::<String>())
}

/// Locates and parses the structured-data block of a page
fn structured_data(document: &Html) -> Result<StructuredData, ScrapeError> {
    let script = selector(r#"script[type="application/ld+json"]"#);

    let payload = document
        .select(&script)
        .next()
        .ok_or(ScrapeError::StructuredDataMissing)?
        .text()
        .collect::<String>();

    Ok(serde_json::from_str(&payload)?)
}

/// Extracts the title id from a link target of the form `/title/<id>/...`
fn title_id_from_href(href: &str) -> Option<String> {
    let rest = href.strip_prefix("/title/")?;
    let end = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))?;
    let (id, tail) = rest.split_at(end);

    if id.is_empty() || !tail.starts_with('/') {
        return None;
    }

    Some(id.to_string())
}

/// Extracts the show summary from a show's main page
///
/// The title and genres come from the structured-data block, which is the
/// one piece of a show page this pipeline cannot work without: its absence
/// fails the extraction.
pub fn extract_show_summary(html: &str, id: &str) -> Result<ShowSummary, ScrapeError> {
    let document = Html::parse_document(html);
    let data = structured_data(&document)?;

    Ok(ShowSummary {
        id: id.to_string(),
        title: decode(&data.name.unwrap_or_default()),
        genres: data
            .genre
            .unwrap_or_default()
            .iter()
            .map(|genre| decode(genre))
            .collect(),
    })
}

/// Counts the seasons offered by the season selector of an episode list page
///
/// Returns 0 when the page has no season selector at all, which is a
/// legitimate terminal outcome for a show without a season listing.
pub fn extract_season_count(html: &str) -> usize {
    let document = Html::parse_document(html);
    let options = selector("select#bySeason > option");

    document.select(&options).count()
}

/// Extracts the entries of a season's episode list page
///
/// List pages carry no reliable structured data, so the repeated list-item
/// markup is scraped directly. An entry whose title id cannot be extracted
/// fails the whole extraction.
pub fn extract_episode_list(html: &str) -> Result<Vec<EpisodeListEntry>, ScrapeError> {
    let document = Html::parse_document(html);
    let items = selector("div.list.detail.eplist > div");
    let name_link = selector(r#"a[itemprop="name"]"#);
    let description_link = selector(r#"a[itemprop="description"]"#);
    let episode_meta = selector(r#"meta[itemprop="episodeNumber"]"#);

    document
        .select(&items)
        .map(|item| {
            let link = item.select(&name_link).next();
            let href = link.and_then(|el| el.value().attr("href")).unwrap_or("");
            let id = title_id_from_href(href).ok_or(ScrapeError::MissingEpisodeId)?;

            Ok(EpisodeListEntry {
                id,
                title: link.map(element_text).unwrap_or_default(),
                description: item.select(&description_link).next().map(element_text),
                episode: item
                    .select(&episode_meta)
                    .next()
                    .and_then(|el| el.value().attr("content"))
                    .and_then(|value| value.parse().ok()),
            })
        })
        .collect()
}

/// Extracts the detail fields from an episode's own page
///
/// Most fields come from the structured-data block. The block does not
/// contain character info so the cast is scraped from the page instead;
/// cast items without a name are still included, as guest appearances
/// without a bio are a common state.
pub fn extract_episode_detail(html: &str) -> Result<Episode, ScrapeError> {
    let document = Html::parse_document(html);
    let data = structured_data(&document)?;

    let cast_items = selector(r#"div[data-testid="title-cast-item"]"#);
    let actor_name = selector(r#"[data-testid="title-cast-item__actor"]"#);
    let character_link = selector(r#"[data-testid="cast-item-characters-link"]"#);
    let headshot = selector("img");

    let cast = document
        .select(&cast_items)
        .map(|item| Casting {
            actor: item
                .select(&actor_name)
                .next()
                .map(element_text)
                .unwrap_or_default(),
            character: item.select(&character_link).next().map(element_text),
            thumbnail: item
                .select(&headshot)
                .next()
                .and_then(|el| el.value().attr("src"))
                .map(str::to_string),
        })
        .collect();

    Ok(Episode {
        title: decode(&data.name.unwrap_or_default()),
        description: data.description.as_deref().map(decode),
        runtime: data.duration.as_deref().and_then(convert_duration),
        content_rating: data.content_rating,
        air_date: data.date_published,
        rating: data.aggregate_rating.and_then(|rating| rating.rating_value),
        cast,
        thumbnails: data.image.into_iter().collect(),
    })
}

/// Converts a `PT<minutes>M<seconds>S` duration string into whole minutes
///
/// The seconds group is optional and contributes its truncated minute value.
/// Malformed or empty input yields `None` ("runtime unknown"), never zero;
/// zero only comes back for input that explicitly encodes it.
pub fn convert_duration(duration: &str) -> Option<u32> {
    static PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^PT(\d+)M(?:(\d+)S)?$").expect("duration pattern is valid"));

    let captures = PATTERN.captures(duration)?;
    let minutes: u32 = captures.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = match captures.get(2) {
        Some(group) => group.as_str().parse().ok()?,
        None => 0,
    };

    Some(minutes + seconds / 60)
}
