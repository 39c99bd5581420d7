//! Rule-based event classification and severity scoring.
//!
//! Rule groups are evaluated in descending base-confidence order, so a
//! headline matching both LAYOFFS and FUNDING patterns classifies as
//! LAYOFFS. First match wins.

use crate::model::{EventClassification, EventType};
use regex::Regex;

const LAYOFFS_PATTERNS: &[&str] = &[
    r"\blayoffs?\b",
    r"\bworkforce reduction\b",
    r"\bstaff cuts?\b",
    r"\bjob cuts?\b",
    r"\bredundanc(?:y|ies)\b",
    r"\bdownsizing\b",
    r"\bheadcount reduction\b",
];

const FUNDING_PATTERNS: &[&str] = &[
    r"\bseries\s+[a-e]\b",
    r"\bseed\b",
    r"\bpre-seed\b",
    r"\bround\b",
    r"\$\s?\d+(?:\.\d+)?\s?(?:m|b)\b",
    r"\b\d+\s?(?:million|billion)\b",
];

const SECURITY_PATTERNS: &[&str] = &[
    r"\bdata breach\b",
    r"\bsecurity incident\b",
    r"\bcyber ?attack\b",
    r"\bransomware\b",
    r"\bhacked\b",
    r"\bcompromised?\b",
];

const EXEC_PATTERNS: &[&str] = &[
    r"\b(?:ceo|cto|cfo|coo|chief\s+\w+\s+officer)\b",
    r"\b(?:appoints?|joins?|steps\s+down|resigns?|leaves?)\b",
];

const HIRING_PATTERNS: &[&str] = &[
    r"\bhiring\b",
    r"\bopen roles\b",
    r"\bnow hiring\b",
    r"\bgrowing team\b",
    r"\bexpanding\b",
];

const LAUNCH_PATTERNS: &[&str] = &[
    r"\blaunch(?:es|ed|ing)?\b",
    r"\brelease(?:s|d|ing)?\b",
    r"\bunveil(?:s|ed|ing)?\b",
];

const AWARD_PATTERNS: &[&str] = &[
    r"\bawards?\b",
    r"\bwinner\b",
    r"\brecognition\b",
    r"\bhonor(?:ed)?\b",
];

const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Authoritative outlets whose coverage bumps severity
const AUTHORITY_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "theverge.com",
    "wsj.com",
    "ft.com",
    "reuters.com",
    "bloomberg.com",
];

const AUTHORITY_BONUS: f64 = 0.1;

struct RuleGroup {
    event_type: EventType,
    confidence: f64,
    patterns: Vec<Regex>,
}

pub struct EventClassifier {
    groups: Vec<RuleGroup>,
}

impl EventClassifier {
    pub fn new() -> Self {
        let groups = vec![
            rule_group(EventType::Layoffs, 0.95, LAYOFFS_PATTERNS),
            rule_group(EventType::Funding, 0.9, FUNDING_PATTERNS),
            rule_group(EventType::SecurityIncident, 0.9, SECURITY_PATTERNS),
            rule_group(EventType::ExecChange, 0.75, EXEC_PATTERNS),
            rule_group(EventType::Hiring, 0.6, HIRING_PATTERNS),
            rule_group(EventType::ProductLaunch, 0.6, LAUNCH_PATTERNS),
            rule_group(EventType::Award, 0.6, AWARD_PATTERNS),
        ];
        Self { groups }
    }

    /// Classify a headline plus optional snippet.
    ///
    /// Unmatched text falls through to PRESS_MENTION.
    pub fn classify(&self, title: &str, snippet: &str) -> EventClassification {
        let text = format!("{} {}", title, snippet).to_lowercase();

        for group in &self.groups {
            if group.patterns.iter().any(|re| re.is_match(&text)) {
                return EventClassification {
                    event_type: group.event_type,
                    base_confidence: group.confidence,
                };
            }
        }

        EventClassification {
            event_type: EventType::PressMention,
            base_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn rule_group(event_type: EventType, confidence: f64, patterns: &[&str]) -> RuleGroup {
    RuleGroup {
        event_type,
        confidence,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("classifier patterns compile"))
            .collect(),
    }
}

/// Intrinsic severity of an event category
pub fn base_severity(event_type: EventType) -> f64 {
    match event_type {
        EventType::Funding => 0.9,
        EventType::Layoffs => 0.85,
        EventType::SecurityIncident => 0.8,
        EventType::ExecChange => 0.75,
        EventType::ProductLaunch => 0.65,
        EventType::Award => 0.6,
        EventType::Hiring => 0.55,
        EventType::PressMention => 0.5,
    }
}

/// Severity after the source-authority bonus, capped at 1.0
pub fn score_severity(event_type: EventType, source_domain: &str) -> f64 {
    let mut severity = base_severity(event_type);
    let domain = source_domain.to_lowercase();
    if AUTHORITY_DOMAINS.iter().any(|d| domain.contains(d)) {
        severity = (severity + AUTHORITY_BONUS).min(1.0);
    }
    severity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EventClassifier {
        EventClassifier::new()
    }

    #[test]
    fn test_funding_round_classification() {
        let result = classifier().classify("Acme raises $10M Series B", "");
        assert_eq!(result.event_type, EventType::Funding);
        assert_eq!(result.base_confidence, 0.9);
    }

    #[test]
    fn test_layoffs_classification() {
        let result = classifier().classify("Acme announces layoffs amid restructuring", "");
        assert_eq!(result.event_type, EventType::Layoffs);
        assert_eq!(result.base_confidence, 0.95);
    }

    #[test]
    fn test_security_incident_classification() {
        let result = classifier().classify("Acme hit by ransomware attack", "");
        assert_eq!(result.event_type, EventType::SecurityIncident);
    }

    #[test]
    fn test_exec_change_classification() {
        let result = classifier().classify("Acme appoints new CTO", "");
        assert_eq!(result.event_type, EventType::ExecChange);
        assert_eq!(result.base_confidence, 0.75);
    }

    #[test]
    fn test_hiring_classification() {
        let result = classifier().classify("Acme is hiring across engineering", "");
        assert_eq!(result.event_type, EventType::Hiring);
    }

    #[test]
    fn test_product_launch_classification() {
        let result = classifier().classify("Acme unveils new analytics product", "");
        assert_eq!(result.event_type, EventType::ProductLaunch);
    }

    #[test]
    fn test_award_classification() {
        let result = classifier().classify("Acme named winner of industry prize", "");
        assert_eq!(result.event_type, EventType::Award);
    }

    #[test]
    fn test_default_press_mention() {
        let result = classifier().classify("Acme mentioned in passing", "");
        assert_eq!(result.event_type, EventType::PressMention);
        assert_eq!(result.base_confidence, 0.5);
    }

    #[test]
    fn test_snippet_contributes_to_classification() {
        let result = classifier().classify("Acme in the news", "closed a seed round today");
        assert_eq!(result.event_type, EventType::Funding);
    }

    #[test]
    fn layoffs_beats_funding_keyword() {
        // "round" alone would classify as FUNDING; the LAYOFFS group
        // carries higher confidence and is evaluated first.
        let result = classifier().classify("Acme layoffs follow latest funding round", "");
        assert_eq!(result.event_type, EventType::Layoffs);
    }

    #[test]
    fn ordering_is_confidence_descending() {
        let classifier = classifier();
        let confidences: Vec<f64> = classifier.groups.iter().map(|g| g.confidence).collect();
        let mut sorted = confidences.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(confidences, sorted);
    }

    #[test]
    fn test_base_severity_table() {
        assert_eq!(base_severity(EventType::Funding), 0.9);
        assert_eq!(base_severity(EventType::Layoffs), 0.85);
        assert_eq!(base_severity(EventType::SecurityIncident), 0.8);
        assert_eq!(base_severity(EventType::ExecChange), 0.75);
        assert_eq!(base_severity(EventType::ProductLaunch), 0.65);
        assert_eq!(base_severity(EventType::Award), 0.6);
        assert_eq!(base_severity(EventType::Hiring), 0.55);
        assert_eq!(base_severity(EventType::PressMention), 0.5);
    }

    #[test]
    fn test_authority_bonus_applied_and_capped() {
        assert_eq!(score_severity(EventType::ExecChange, "example.com"), 0.75);
        assert_eq!(
            score_severity(EventType::ExecChange, "techcrunch.com"),
            0.85
        );
        assert_eq!(
            score_severity(EventType::ExecChange, "www.techcrunch.com"),
            0.85
        );
        // 0.9 + 0.1 caps at 1.0
        assert_eq!(score_severity(EventType::Funding, "reuters.com"), 1.0);
    }
}
