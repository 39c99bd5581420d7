use super::{FeedRetriever, RetrieverError, USER_AGENT};
use crate::model::FeedItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google News RSS search, no API key needed
pub struct GoogleNewsRetriever {
    client: Client,
    lang: String,
}

impl GoogleNewsRetriever {
    pub fn new(lang: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl FeedRetriever for GoogleNewsRetriever {
    fn source(&self) -> &'static str {
        "google_news_rss"
    }

    async fn search(
        &self,
        query: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<FeedItem>, RetrieverError> {
        tracing::debug!(query = %query, "Querying Google News RSS");

        let response = self
            .client
            .get(GOOGLE_NEWS_RSS_URL)
            .query(&[("q", query), ("hl", self.lang.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrieverError::UnexpectedStatus(status));
        }

        let bytes = response.bytes().await?;
        parse_feed(&bytes, self.source(), since)
    }
}

/// Parse an RSS or Atom document into feed items.
///
/// Entries without a title or link are dropped; the updated timestamp
/// stands in when an entry has no published one.
fn parse_feed(
    bytes: &[u8],
    source: &str,
    since: DateTime<Utc>,
) -> Result<Vec<FeedItem>, RetrieverError> {
    let feed =
        feed_rs::parser::parse(bytes).map_err(|e| RetrieverError::ParseError(e.to_string()))?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .filter(|t| !t.trim().is_empty())?;
            let url = entry.links.first().map(|l| l.href.clone())?;
            let published_at = entry.published.or(entry.updated);
            Some(FeedItem {
                title,
                url,
                published_at,
                source: source.to_string(),
            })
        })
        .filter(|item| item.published_at.map(|p| p >= since).unwrap_or(true))
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Search results</title>
    <item>
      <title>Acme raises $10M Series B</title>
      <link>https://news.example/acme-series-b</link>
      <pubDate>Sat, 02 Mar 2024 12:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Acme two years ago</title>
      <link>https://news.example/acme-old</link>
      <pubDate>Wed, 02 Mar 2022 12:00:00 GMT</pubDate>
    </item>
    <item>
      <link>https://news.example/untitled</link>
      <pubDate>Sat, 02 Mar 2024 13:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_filters_old_and_untitled() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let items = parse_feed(SAMPLE_RSS.as_bytes(), "google_news_rss", since).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Acme raises $10M Series B");
        assert_eq!(items[0].url, "https://news.example/acme-series-b");
        assert_eq!(items[0].source, "google_news_rss");
        assert!(items[0].published_at.is_some());
    }

    #[test]
    fn test_parse_feed_keeps_undated_items() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>r</title>
  <item><title>Undated item</title><link>https://news.example/undated</link></item>
</channel></rss>"#;
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let items = parse_feed(rss.as_bytes(), "google_news_rss", since).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].published_at.is_none());
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        let since = Utc::now();
        let result = parse_feed(b"not xml at all", "google_news_rss", since);
        assert!(matches!(result, Err(RetrieverError::ParseError(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_search() {
        let retriever = GoogleNewsRetriever::new("en");
        let since = Utc::now() - chrono::Duration::days(14);
        let items = retriever.search("\"technology\"", since).await.unwrap();
        assert!(!items.is_empty());
    }
}
