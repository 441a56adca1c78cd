//! Show assembly module
//!
//! This module orchestrates the extraction layer across all of a show's
//! pages and assembles the complete in-memory [`Show`] graph. Seasons are
//! fetched concurrently, and so are the episode detail pages within each
//! season; results are always joined back in index order, so the finished
//! graph is canonical regardless of network completion order.
//!
//! Assembly is all-or-nothing: a single failed fetch or parse anywhere in
//! the season/episode graph aborts the whole show with no partial result.

use crate::page_fetcher::{FetchError, PageFetcher};
use crate::scraping::{
    EpisodeListEntry, ScrapeError, Season, SeasonEpisode, Show, extract_episode_detail,
    extract_episode_list, extract_season_count, extract_show_summary,
};
use futures::future::try_join_all;
use thiserror::Error;

/// Errors that can occur during show assembly
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A fetched page could not be parsed
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),
}

/// Address of a title's main page
fn title_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{id}/")
}

/// Address of a title's episode list page for one season
fn episodes_url(id: &str, season: u32) -> String {
    format!("https://www.imdb.com/title/{id}/episodes?season={season}")
}

/// Assembles the complete entity graph for the show with the given title id
///
/// Fetches the show's main page for its summary, discovers the season count
/// from season 1's episode list page, and then walks every season's list and
/// every episode's detail page. The returned `Show` has seasons ordered
/// 1..count and episodes in source list order.
pub async fn assemble_show<F>(fetcher: &F, id: &str) -> Result<Show, AssemblyError>
where
    F: PageFetcher + Sync,
{
    let summary_page = fetcher.fetch_page(&title_url(id)).await?;
    let summary = extract_show_summary(&summary_page, id)?;

    // The season selector is only present on episode list pages; season 1's
    // page doubles as the source of the season count.
    let first_list_page = fetcher.fetch_page(&episodes_url(id, 1)).await?;
    let season_count = extract_season_count(&first_list_page) as u32;

    let seasons = try_join_all(
        (1..=season_count).map(|season| assemble_season(fetcher, id, season)),
    )
    .await?;

    Ok(Show {
        id: summary.id,
        title: summary.title,
        genres: summary.genres,
        seasons,
    })
}

/// Assembles one season: its episode list plus every episode's detail page
async fn assemble_season<F>(
    fetcher: &F,
    show_id: &str,
    season: u32,
) -> Result<Season, AssemblyError>
where
    F: PageFetcher + Sync,
{
    let list_page = fetcher.fetch_page(&episodes_url(show_id, season)).await?;
    let entries = extract_episode_list(&list_page)?;

    let episodes = try_join_all(
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| assemble_episode(fetcher, season, index, entry)),
    )
    .await?;

    Ok(Season { season, episodes })
}

/// Fetches an episode's detail page and merges it into its list entry
///
/// The episode number is the explicit list number when present, else the
/// entry's 1-based position within the season list.
async fn assemble_episode<F>(
    fetcher: &F,
    season: u32,
    index: usize,
    entry: EpisodeListEntry,
) -> Result<SeasonEpisode, AssemblyError>
where
    F: PageFetcher + Sync,
{
    let detail_page = fetcher.fetch_page(&title_url(&entry.id)).await?;
    let detail = extract_episode_detail(&detail_page)?;

    Ok(SeasonEpisode {
        id: entry.id,
        season,
        episode: entry.episode.unwrap_or(index as u32 + 1),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Fetcher stub serving pages from an in-memory map keyed by URL
    struct StubFetcher {
        pages: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
            }
        }

        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or(FetchError::ErrorPage {
                    url: url.to_string(),
                })
        }
    }

    fn show_page(title: &str) -> String {
        format!(
            r#"<script type="application/ld+json">{{"name":"{title}","genre":["Drama","Comedy"]}}</script>"#
        )
    }

    fn detail_page(title: &str) -> String {
        format!(
            r#"<script type="application/ld+json">{{"name":"{title}","description":"About {title}.","duration":"PT45M","datePublished":"2008-01-20"}}</script>"#
        )
    }

    /// A one-season list page: season selector with one option and the
    /// given entries, where `None` omits the explicit episode number
    fn list_page(entries: &[(&str, Option<u32>)]) -> String {
        let mut items = String::new();
        for (id, number) in entries {
            items.push_str(&format!(r#"<div><a itemprop="name" href="/title/{id}/">Ep</a>"#));
            if let Some(number) = number {
                items.push_str(&format!(r#"<meta itemprop="episodeNumber" content="{number}">"#));
            }
            items.push_str("</div>");
        }
        format!(
            r#"<select id="bySeason"><option value="1">1</option></select>
               <div class="list detail eplist">{items}</div>"#
        )
    }

    #[tokio::test]
    async fn test_assembles_show_graph_in_canonical_order() {
        let fetcher = StubFetcher::new()
            .page("https://www.imdb.com/title/tt0900000/", &show_page("Sandstorm"))
            .page(
                "https://www.imdb.com/title/tt0900000/episodes?season=1",
                &list_page(&[("tt1000001", Some(1)), ("tt1000002", Some(2))]),
            )
            .page("https://www.imdb.com/title/tt1000001/", &detail_page("Pilot"))
            .page("https://www.imdb.com/title/tt1000002/", &detail_page("Fallout"));

        let show = assemble_show(&fetcher, "tt0900000").await.unwrap();

        assert_eq!(show.id, "tt0900000");
        assert_eq!(show.title, "Sandstorm");
        assert_eq!(show.genres, vec!["Drama", "Comedy"]);
        assert_eq!(show.seasons.len(), 1);

        let season = &show.seasons[0];
        assert_eq!(season.season, 1);
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.episodes[0].id, "tt1000001");
        assert_eq!(season.episodes[0].episode, 1);
        assert_eq!(season.episodes[0].detail.title, "Pilot");
        assert_eq!(season.episodes[0].detail.runtime, Some(45));
        assert_eq!(season.episodes[1].id, "tt1000002");
        assert_eq!(season.episodes[1].episode, 2);
    }

    #[tokio::test]
    async fn test_episode_number_falls_back_to_list_position() {
        let fetcher = StubFetcher::new()
            .page("https://www.imdb.com/title/tt0900000/", &show_page("Sandstorm"))
            .page(
                "https://www.imdb.com/title/tt0900000/episodes?season=1",
                &list_page(&[
                    ("tt1000001", Some(1)),
                    ("tt1000002", Some(2)),
                    ("tt1000003", None),
                ]),
            )
            .page("https://www.imdb.com/title/tt1000001/", &detail_page("One"))
            .page("https://www.imdb.com/title/tt1000002/", &detail_page("Two"))
            .page("https://www.imdb.com/title/tt1000003/", &detail_page("Three"));

        let show = assemble_show(&fetcher, "tt0900000").await.unwrap();
        let episodes = &show.seasons[0].episodes;

        // The third entry has no explicit number and gets its 1-based position
        assert_eq!(episodes[2].id, "tt1000003");
        assert_eq!(episodes[2].episode, 3);
    }

    #[tokio::test]
    async fn test_show_without_season_listing_yields_zero_seasons() {
        let fetcher = StubFetcher::new()
            .page("https://www.imdb.com/title/tt0900000/", &show_page("Sandstorm"))
            .page(
                "https://www.imdb.com/title/tt0900000/episodes?season=1",
                "<html><body>no selector here</body></html>",
            );

        let show = assemble_show(&fetcher, "tt0900000").await.unwrap();

        assert!(show.seasons.is_empty());
    }

    #[tokio::test]
    async fn test_missing_structured_data_aborts_assembly() {
        let fetcher = StubFetcher::new()
            .page("https://www.imdb.com/title/tt0900000/", "<html>no data</html>");

        let result = assemble_show(&fetcher, "tt0900000").await;

        assert!(matches!(
            result,
            Err(AssemblyError::Scrape(ScrapeError::StructuredDataMissing))
        ));
    }

    #[tokio::test]
    async fn test_failed_episode_fetch_aborts_assembly() {
        // Episode tt1000002's detail page is missing from the stub
        let fetcher = StubFetcher::new()
            .page("https://www.imdb.com/title/tt0900000/", &show_page("Sandstorm"))
            .page(
                "https://www.imdb.com/title/tt0900000/episodes?season=1",
                &list_page(&[("tt1000001", Some(1)), ("tt1000002", Some(2))]),
            )
            .page("https://www.imdb.com/title/tt1000001/", &detail_page("One"));

        let result = assemble_show(&fetcher, "tt0900000").await;

        assert!(matches!(result, Err(AssemblyError::Fetch(_))));
    }
}
