use super::USER_AGENT;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause before each fetch so bursts of article requests stay polite
const COURTESY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Fetches raw page content for verification
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for ArticleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for ArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tokio::time::sleep(COURTESY_DELAY).await;

        tracing::debug!(url = %url, "Fetching article content");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_real_page() {
        let fetcher = ArticleFetcher::new();
        let body = fetcher.fetch("https://example.com").await.unwrap();
        assert!(body.contains("Example Domain"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_missing_page_is_status_error() {
        let fetcher = ArticleFetcher::new();
        let result = fetcher.fetch("https://example.com/definitely-missing-404").await;
        assert!(matches!(result, Err(FetchError::Status { .. })));
    }
}
