/// Typed schema for the schema.org structured-data block embedded in pages.
///
/// Every field is individually optional: the block's shape varies between
/// show and episode pages, and single fields disappear without warning.
/// Unknown fields are ignored.
use serde::Deserialize;

/// The `application/ld+json` payload of a title page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StructuredData {
    /// Title of the show or episode
    pub name: Option<String>,
    /// Plot description
    pub description: Option<String>,
    /// Genre labels (present on show pages)
    pub genre: Option<Vec<String>>,
    /// Content rating label
    pub content_rating: Option<String>,
    /// Air date (ISO-like)
    pub date_published: Option<String>,
    /// Runtime as an ISO-8601-style duration (e.g. `PT45M`)
    pub duration: Option<String>,
    /// URL of the primary image
    pub image: Option<String>,
    /// Aggregated user rating
    pub aggregate_rating: Option<AggregateRating>,
}

/// The nested aggregate-rating object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AggregateRating {
    pub rating_value: Option<f64>,
}
