use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Business event category assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Funding,
    ExecChange,
    Hiring,
    ProductLaunch,
    Award,
    Layoffs,
    SecurityIncident,
    PressMention,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Funding => "FUNDING",
            EventType::ExecChange => "EXEC_CHANGE",
            EventType::Hiring => "HIRING",
            EventType::ProductLaunch => "PRODUCT_LAUNCH",
            EventType::Award => "AWARD",
            EventType::Layoffs => "LAYOFFS",
            EventType::SecurityIncident => "SECURITY_INCIDENT",
            EventType::PressMention => "PRESS_MENTION",
        }
    }

    /// Parse a stored label, unknown labels fall back to PRESS_MENTION.
    pub fn parse(label: &str) -> Self {
        match label {
            "FUNDING" => EventType::Funding,
            "EXEC_CHANGE" => EventType::ExecChange,
            "HIRING" => EventType::Hiring,
            "PRODUCT_LAUNCH" => EventType::ProductLaunch,
            "AWARD" => EventType::Award,
            "LAYOFFS" => EventType::Layoffs,
            "SECURITY_INCIDENT" => EventType::SecurityIncident,
            _ => EventType::PressMention,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier output: category plus the confidence of the winning rule group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventClassification {
    pub event_type: EventType,
    pub base_confidence: f64,
}

/// Tone label assigned by the tone analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Positive => "POSITIVE",
            Tone::Negative => "NEGATIVE",
            Tone::Neutral => "NEUTRAL",
        }
    }

    pub fn parse(label: &str) -> Self {
        match label {
            "POSITIVE" => Tone::Positive,
            "NEGATIVE" => Tone::Negative,
            _ => Tone::Neutral,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToneVerdict {
    pub tone: Tone,
    pub confidence: f64,
}

/// A verified or unverified company mention, as persisted and served.
///
/// Field semantics:
/// - confidence: name-match score that admitted the item into the pipeline
/// - severity: event severity after the source-authority bonus
/// - verification_confidence: the mention verifier's assembled confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub company_name: String,
    pub company_location: Option<String>,
    pub title: String,
    pub url: String,
    pub source: String,
    pub event_type: EventType,
    pub severity: f64,
    pub confidence: f64,
    pub evidence: Option<String>,
    pub is_verified: bool,
    pub verification_note: Option<String>,
    pub verification_confidence: Option<f64>,
    pub tone: Tone,
    pub tone_confidence: f64,
}
