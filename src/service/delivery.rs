//! Slack webhook delivery.

use crate::model::{DisambiguationResult, EventType, NewsEvent};
use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Slack webhook returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

pub struct SlackDelivery {
    client: Client,
    webhook_url: String,
}

impl SlackDelivery {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// Post one event to the webhook
    pub async fn post_event(
        &self,
        event: &NewsEvent,
        resolution: Option<&DisambiguationResult>,
    ) -> Result<(), DeliveryError> {
        let text = format_message(event, resolution);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::UnexpectedStatus(status));
        }

        tracing::debug!(company = %event.company_name, event_type = %event.event_type, "Delivered event to Slack");
        Ok(())
    }
}

/// Render the Slack message for an event.
///
/// Unverified events carry a warning header with the verification note.
/// A verified entity resolution adds one trailing line.
pub fn format_message(event: &NewsEvent, resolution: Option<&DisambiguationResult>) -> String {
    let emoji = emoji_for(event.event_type);
    let flair = flair_for(event.event_type);

    let location = event
        .company_location
        .as_deref()
        .map(|l| format!(" in {l}"))
        .unwrap_or_default();

    let date = event
        .published_at
        .unwrap_or(event.created_at)
        .format("%Y-%m-%d");

    let mut text = format!(
        "{emoji} *{event_type}: {company}{location}*\n{title}\n<{url}|Evidence link> · {date} · Sev {severity:.2}\n_{flair}_",
        event_type = event.event_type,
        company = event.company_name,
        title = event.title,
        url = event.url,
        severity = event.severity,
    );

    if let Some(resolution) = resolution {
        if resolution.is_verified {
            text.push_str(&format!(
                "\n_Resolved: {} via {}_",
                resolution.entity_name, resolution.source
            ));
        }
    }

    if !event.is_verified {
        let note = event.verification_note.as_deref().unwrap_or("unverified");
        text = format!("⚠️ *UNVERIFIED MENTION*\n_{note}_\n{text}");
    }

    text
}

fn emoji_for(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Funding => "🎉",
        EventType::ExecChange => "🧭",
        EventType::Hiring => "📈",
        EventType::ProductLaunch => "🚀",
        EventType::Award => "🏆",
        EventType::Layoffs => "📉",
        EventType::SecurityIncident => "🛡️",
        EventType::PressMention => "📰",
    }
}

fn flair_for(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Funding => "Fresh capital on the books",
        EventType::ExecChange => "Leadership is shifting",
        EventType::Hiring => "The team is growing",
        EventType::ProductLaunch => "Something new just shipped",
        EventType::Award => "Recognition earned",
        EventType::Layoffs => "Tough news for the team",
        EventType::SecurityIncident => "Keep an eye on this one",
        EventType::PressMention => "In the news",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisambiguationSource, Tone};
    use chrono::{TimeZone, Utc};

    fn create_test_event() -> NewsEvent {
        NewsEvent {
            id: Some(1),
            created_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            company_name: "Acme".to_string(),
            company_location: Some("Berlin".to_string()),
            title: "Acme raises $10M Series B".to_string(),
            url: "https://news.example/acme".to_string(),
            source: "google_news_rss".to_string(),
            event_type: EventType::Funding,
            severity: 0.9,
            confidence: 1.0,
            evidence: Some("https://news.example/acme".to_string()),
            is_verified: true,
            verification_note: None,
            verification_confidence: Some(0.9),
            tone: Tone::Positive,
            tone_confidence: 0.76,
        }
    }

    #[test]
    fn test_verified_message_format() {
        let message = format_message(&create_test_event(), None);
        assert!(message.starts_with("🎉 *FUNDING: Acme in Berlin*"));
        assert!(message.contains("Acme raises $10M Series B"));
        assert!(message.contains("<https://news.example/acme|Evidence link>"));
        assert!(message.contains("2024-03-01"));
        assert!(message.contains("Sev 0.90"));
        assert!(message.contains("_Fresh capital on the books_"));
        assert!(!message.contains("UNVERIFIED"));
    }

    #[test]
    fn test_unverified_message_carries_note() {
        let mut event = create_test_event();
        event.is_verified = false;
        event.verification_note = Some("no company domain found in content".to_string());

        let message = format_message(&event, None);
        assert!(message.starts_with("⚠️ *UNVERIFIED MENTION*"));
        assert!(message.contains("no company domain found in content"));
        assert!(message.contains("🎉 *FUNDING: Acme in Berlin*"));
    }

    #[test]
    fn test_missing_location_omitted() {
        let mut event = create_test_event();
        event.company_location = None;
        let message = format_message(&event, None);
        assert!(message.contains("*FUNDING: Acme*\n"));
    }

    #[test]
    fn test_missing_published_date_uses_created() {
        let mut event = create_test_event();
        event.published_at = None;
        let message = format_message(&event, None);
        assert!(message.contains("2024-03-02"));
    }

    #[test]
    fn test_verified_resolution_appended() {
        let resolution = DisambiguationResult {
            entity_name: "Acme Corporation".to_string(),
            is_verified: true,
            confidence: 0.9,
            entity_types: vec!["Corporation".to_string()],
            description: Some("American software company".to_string()),
            url: None,
            source: DisambiguationSource::GoogleKnowledgeGraph,
        };
        let message = format_message(&create_test_event(), Some(&resolution));
        assert!(message.contains("_Resolved: Acme Corporation via google_knowledge_graph_"));

        let unresolved = DisambiguationResult {
            is_verified: false,
            ..resolution
        };
        let message = format_message(&create_test_event(), Some(&unresolved));
        assert!(!message.contains("Resolved:"));
    }

    #[test]
    fn test_each_event_type_has_distinct_emoji() {
        let types = [
            EventType::Funding,
            EventType::ExecChange,
            EventType::Hiring,
            EventType::ProductLaunch,
            EventType::Award,
            EventType::Layoffs,
            EventType::SecurityIncident,
            EventType::PressMention,
        ];
        let emojis: std::collections::HashSet<&str> = types.iter().map(|t| emoji_for(*t)).collect();
        assert_eq!(emojis.len(), types.len());
    }
}
