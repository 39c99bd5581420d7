//! Entity disambiguation backends.
//!
//! A backend resolves a company name against a knowledge base and reports
//! how confident it is that the name denotes a real company. Resolutions
//! enrich delivery output; they never override the verification verdict.
//!
//! Backend selection: Google Knowledge Graph when an API key is
//! configured, otherwise Wikidata when enabled, otherwise heuristics.
//! Network backends fall back to the heuristic one on error.

mod google_kg;
mod heuristic;
mod wikidata;

pub use google_kg::GoogleKnowledgeGraphDisambiguator;
pub use heuristic::HeuristicDisambiguator;
pub use wikidata::WikidataDisambiguator;

use crate::model::{Config, DisambiguationResult, DisambiguationSource};
use crate::service::lexicon::Lexicons;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

const NAME_WEIGHT: f64 = 0.4;
const TYPE_WEIGHT: f64 = 0.3;
const DESCRIPTION_WEIGHT: f64 = 0.2;
const CONTEXT_WEIGHT: f64 = 0.1;

/// Knowledge-base confidence above which a resolution counts as verified
const VERIFY_THRESHOLD: f64 = 0.7;

/// Words in an entity description that indicate a business
const DESCRIPTION_BUSINESS_TERMS: &[&str] = &[
    "company",
    "corporation",
    "business",
    "enterprise",
    "startup",
    "firm",
    "organization",
    "manufacturer",
    "provider",
    "brand",
];

#[derive(Debug, thiserror::Error)]
pub enum DisambiguationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

#[async_trait]
pub trait EntityDisambiguator: Send + Sync {
    /// Resolve a company name given the text it appeared in.
    ///
    /// Implementations degrade instead of erroring: a failed lookup
    /// produces a heuristic resolution, never a failure.
    async fn resolve(&self, name: &str, context: &str) -> DisambiguationResult;

    fn backend(&self) -> DisambiguationSource;
}

/// Select the backend the configuration asks for
pub fn from_config(config: &Config, lexicons: Arc<Lexicons>) -> Arc<dyn EntityDisambiguator> {
    if let Some(key) = &config.google_kg_api_key {
        tracing::info!("Entity disambiguation backend: Google Knowledge Graph");
        Arc::new(GoogleKnowledgeGraphDisambiguator::new(
            key.clone(),
            HeuristicDisambiguator::new(Arc::clone(&lexicons)),
        ))
    } else if config.wikidata_enabled {
        tracing::info!("Entity disambiguation backend: Wikidata");
        Arc::new(WikidataDisambiguator::new(HeuristicDisambiguator::new(
            lexicons,
        )))
    } else {
        tracing::info!("Entity disambiguation backend: heuristic");
        Arc::new(HeuristicDisambiguator::new(lexicons))
    }
}

/// Evidence extracted from one knowledge-base candidate
pub(super) struct CandidateSignals<'a> {
    pub name: &'a str,
    pub has_business_type: bool,
    pub description: Option<&'a str>,
}

/// Weighted candidate score in [0, 1]
pub(super) fn score_candidate(query: &str, context: &str, candidate: &CandidateSignals<'_>) -> f64 {
    let description = candidate.description.unwrap_or("");
    let type_score = if candidate.has_business_type { 1.0 } else { 0.0 };
    let desc_score = if has_business_description(description) {
        1.0
    } else {
        0.0
    };

    NAME_WEIGHT * name_score(query, candidate.name)
        + TYPE_WEIGHT * type_score
        + DESCRIPTION_WEIGHT * desc_score
        + CONTEXT_WEIGHT * context_overlap(context, description)
}

pub(super) fn is_verified_confidence(confidence: f64) -> bool {
    confidence > VERIFY_THRESHOLD
}

/// Name agreement: exact 1.0, containment 0.8, otherwise token Jaccard
pub(super) fn name_score(query: &str, candidate: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if query == candidate {
        return 1.0;
    }
    if query.contains(&candidate) || candidate.contains(&query) {
        return 0.8;
    }

    let query_tokens = tokens(&query);
    let candidate_tokens = tokens(&candidate);
    let union = query_tokens.union(&candidate_tokens).count();
    if union == 0 {
        return 0.0;
    }
    let common = query_tokens.intersection(&candidate_tokens).count();
    common as f64 / union as f64
}

pub(super) fn has_business_description(description: &str) -> bool {
    let description = description.to_lowercase();
    DESCRIPTION_BUSINESS_TERMS
        .iter()
        .any(|term| description.contains(term))
}

/// Share of meaningful context words echoed in the description, five
/// common words saturate the score
pub(super) fn context_overlap(context: &str, description: &str) -> f64 {
    let context_words: HashSet<String> = meaningful_tokens(context);
    let description_words: HashSet<String> = meaningful_tokens(description);
    let common = context_words.intersection(&description_words).count();
    (common as f64 / 5.0).min(1.0)
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn meaningful_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 4)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_score_tiers() {
        assert_eq!(name_score("Acme", "Acme"), 1.0);
        assert_eq!(name_score("acme", "ACME"), 1.0);
        assert_eq!(name_score("Acme", "Acme Corporation"), 0.8);
        assert_eq!(name_score("", "Acme"), 0.0);
        // Token overlap: {acme, labs} vs {acme, research} shares 1 of 3
        let score = name_score("Acme Labs", "Acme Research");
        assert!(score > 0.0 && score < 0.8, "got {score}");
    }

    #[test]
    fn test_business_description_terms() {
        assert!(has_business_description("American software company"));
        assert!(has_business_description("A STARTUP from Berlin"));
        assert!(!has_business_description("A river in Egypt"));
    }

    #[test]
    fn test_context_overlap_saturates() {
        let context = "software platform cloud analytics data tooling";
        let description = "software platform cloud analytics data company";
        assert_eq!(context_overlap(context, description), 1.0);
        assert_eq!(context_overlap("nothing shared here", "a description"), 0.0);
    }

    #[test]
    fn test_score_candidate_weights() {
        let candidate = CandidateSignals {
            name: "Acme",
            has_business_type: true,
            description: Some("American software company"),
        };
        let score = score_candidate("Acme", "", &candidate);
        // 0.4 name + 0.3 type + 0.2 description + 0.0 context
        assert!((score - 0.9).abs() < 1e-9, "got {score}");
        assert!(is_verified_confidence(score));

        let weak = CandidateSignals {
            name: "Something Else",
            has_business_type: false,
            description: None,
        };
        let score = score_candidate("Acme", "", &weak);
        assert_eq!(score, 0.0);
        assert!(!is_verified_confidence(score));
    }
}
