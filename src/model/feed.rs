use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single headline pulled from a news feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Feed client that produced the item, e.g. "google_news_rss"
    pub source: String,
}
