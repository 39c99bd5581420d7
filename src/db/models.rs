//! Database models for news events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::{EventType, NewsEvent, Tone};

/// Database representation of a news event
#[derive(Debug, Clone, FromRow)]
pub struct NewsEventRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub company_name: String,
    pub company_location: Option<String>,
    pub title: String,
    pub url: String,
    pub source: String,
    pub event_type: String,
    pub severity: f64,
    pub confidence: f64,
    pub evidence: Option<String>,
    pub is_verified: bool,
    pub verification_note: Option<String>,
    pub verification_confidence: Option<f64>,
    pub tone: String,
    pub tone_confidence: f64,
}

impl NewsEventRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> NewsEvent {
        NewsEvent {
            id: Some(self.id),
            created_at: self.created_at,
            published_at: self.published_at,
            company_name: self.company_name,
            company_location: self.company_location,
            title: self.title,
            url: self.url,
            source: self.source,
            event_type: EventType::parse(&self.event_type),
            severity: self.severity,
            confidence: self.confidence,
            evidence: self.evidence,
            is_verified: self.is_verified,
            verification_note: self.verification_note,
            verification_confidence: self.verification_confidence,
            tone: Tone::parse(&self.tone),
            tone_confidence: self.tone_confidence,
        }
    }
}

/// Query parameters for listing events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEventsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub company: Option<String>,
    pub event_type: Option<String>,
    pub verified_only: bool,
}

/// Paginated response for events
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedEvents {
    pub events: Vec<NewsEvent>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}
