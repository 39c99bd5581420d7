use super::{FeedRetriever, RetrieverError, USER_AGENT};
use crate::model::FeedItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: &str = "50";

/// NewsAPI /v2/everything client
pub struct NewsApiRetriever {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

impl NewsApiRetriever {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }
}

#[async_trait]
impl FeedRetriever for NewsApiRetriever {
    fn source(&self) -> &'static str {
        "newsapi"
    }

    async fn search(
        &self,
        query: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<FeedItem>, RetrieverError> {
        tracing::debug!(query = %query, "Querying NewsAPI");

        let from = since.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(NEWSAPI_URL)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", PAGE_SIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrieverError::UnexpectedStatus(status));
        }

        let parsed: NewsApiResponse = response.json().await?;
        items_from_response(parsed, self.source(), since)
    }
}

fn items_from_response(
    response: NewsApiResponse,
    source: &str,
    since: DateTime<Utc>,
) -> Result<Vec<FeedItem>, RetrieverError> {
    if response.status != "ok" {
        return Err(RetrieverError::ParseError(
            response
                .message
                .unwrap_or_else(|| "NewsAPI returned an error".to_string()),
        ));
    }

    let items = response
        .articles
        .into_iter()
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.trim().is_empty())?;
            let url = article.url.filter(|u| !u.is_empty())?;
            Some(FeedItem {
                title,
                url,
                published_at: article.published_at,
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

    #[test]
    fn test_response_mapping() {
        let response: NewsApiResponse = serde_json::from_str(
            r#"{
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {
                        "title": "Acme raises $10M Series B",
                        "url": "https://news.example/acme",
                        "publishedAt": "2024-03-02T12:00:00Z"
                    },
                    {
                        "title": null,
                        "url": "https://news.example/untitled",
                        "publishedAt": "2024-03-02T13:00:00Z"
                    }
                ]
            }"#,
        )
        .unwrap();

        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let items = items_from_response(response, "newsapi", since).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Acme raises $10M Series B");
        assert_eq!(items[0].source, "newsapi");
    }

    #[test]
    fn test_error_status_surfaces_message() {
        let response: NewsApiResponse = serde_json::from_str(
            r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid"}"#,
        )
        .unwrap();
        let result = items_from_response(response, "newsapi", Utc::now());
        match result {
            Err(RetrieverError::ParseError(message)) => {
                assert!(message.contains("invalid"));
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_old_articles_filtered() {
        let response: NewsApiResponse = serde_json::from_str(
            r#"{
                "status": "ok",
                "articles": [
                    {"title": "Old", "url": "https://news.example/old", "publishedAt": "2020-01-01T00:00:00Z"}
                ]
            }"#,
        )
        .unwrap();
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let items = items_from_response(response, "newsapi", since).unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access and NEWSAPI_KEY
    async fn test_live_search() {
        let api_key = std::env::var("NEWSAPI_KEY").expect("NEWSAPI_KEY set");
        let retriever = NewsApiRetriever::new(api_key);
        let since = Utc::now() - chrono::Duration::days(7);
        let items = retriever.search("technology", since).await.unwrap();
        assert!(!items.is_empty());
    }
}
