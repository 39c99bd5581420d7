//! News feed retrieval and article content fetching.

mod article;
mod google_news;
mod newsapi;

pub use article::{ArticleFetcher, ContentFetcher, FetchError};
pub use google_news::GoogleNewsRetriever;
pub use newsapi::NewsApiRetriever;

use crate::model::{Config, FeedItem};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (compatible; mention-intel/1.0)";

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse feed: {0}")]
    ParseError(String),

    #[error("Unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// A news feed that can be searched for recent company coverage
#[async_trait]
pub trait FeedRetriever: Send + Sync {
    /// Stable source label stored on every item this feed produces
    fn source(&self) -> &'static str;

    /// Items matching the query, no older than `since`. Items without a
    /// publication date are kept.
    async fn search(
        &self,
        query: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<FeedItem>, RetrieverError>;
}

/// Fans a query out to every configured feed
pub struct FeedDispatcher {
    retrievers: Vec<Box<dyn FeedRetriever>>,
}

impl FeedDispatcher {
    /// Build the feed set the configuration enables. Google News is
    /// always on; NewsAPI joins when a key is present.
    pub fn new(config: &Config) -> Self {
        let mut retrievers: Vec<Box<dyn FeedRetriever>> = vec![Box::new(
            GoogleNewsRetriever::new(config.google_news_lang.clone()),
        )];
        if let Some(key) = &config.newsapi_key {
            retrievers.push(Box::new(NewsApiRetriever::new(key.clone())));
        }

        let sources: Vec<&str> = retrievers.iter().map(|r| r.source()).collect();
        tracing::info!(sources = ?sources, "Feed retrievers configured");
        Self { retrievers }
    }

    pub fn with_retrievers(retrievers: Vec<Box<dyn FeedRetriever>>) -> Self {
        Self { retrievers }
    }

    /// Query every feed; a failing feed is logged and skipped
    pub async fn search_all(&self, query: &str, since: DateTime<Utc>) -> Vec<FeedItem> {
        let results = futures::future::join_all(
            self.retrievers
                .iter()
                .map(|r| async move { (r.source(), r.search(query, since).await) }),
        )
        .await;

        let mut items = Vec::new();
        for (source, result) in results {
            match result {
                Ok(mut found) => {
                    tracing::debug!(source, count = found.len(), query = %query, "Feed query returned");
                    items.append(&mut found);
                }
                Err(e) => {
                    tracing::warn!(source, error = %e, "Feed query failed, skipping source");
                }
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRetriever {
        source: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl FeedRetriever for StubRetriever {
        fn source(&self) -> &'static str {
            self.source
        }

        async fn search(
            &self,
            query: &str,
            _since: DateTime<Utc>,
        ) -> Result<Vec<FeedItem>, RetrieverError> {
            if self.fail {
                return Err(RetrieverError::ParseError("boom".to_string()));
            }
            Ok(vec![FeedItem {
                title: format!("{query} headline"),
                url: format!("https://{}/article", self.source),
                published_at: None,
                source: self.source.to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn test_search_all_skips_failing_feed() {
        let dispatcher = FeedDispatcher::with_retrievers(vec![
            Box::new(StubRetriever {
                source: "ok_feed",
                fail: false,
            }),
            Box::new(StubRetriever {
                source: "broken_feed",
                fail: true,
            }),
        ]);

        let items = dispatcher.search_all("Acme", Utc::now()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "ok_feed");
        assert_eq!(items[0].title, "Acme headline");
    }

    #[tokio::test]
    async fn test_search_all_merges_feeds() {
        let dispatcher = FeedDispatcher::with_retrievers(vec![
            Box::new(StubRetriever {
                source: "feed_a",
                fail: false,
            }),
            Box::new(StubRetriever {
                source: "feed_b",
                fail: false,
            }),
        ]);

        let items = dispatcher.search_all("Acme", Utc::now()).await;
        assert_eq!(items.len(), 2);
    }
}
