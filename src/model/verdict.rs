use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Best fuzzy-match result over the watch list for one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CandidateMatch {
    pub matched_name: Option<String>,
    pub score: f64,
}

impl CandidateMatch {
    pub fn none() -> Self {
        Self {
            matched_name: None,
            score: 0.0,
        }
    }
}

/// How the verifier's name-similarity scan resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NameMatchType {
    ExactMatch,
    AllWordsPresent,
    MajorityWordsMatch,
    SingleWordBusinessContext,
    SingleWordNoContext,
    HighRiskSingleWordWithContext,
    HighRiskSingleWordNoContext,
    SingleWordGenericOrNotFound,
    NoMatch,
}

impl NameMatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameMatchType::ExactMatch => "exact_match",
            NameMatchType::AllWordsPresent => "all_words_present",
            NameMatchType::MajorityWordsMatch => "majority_words_match",
            NameMatchType::SingleWordBusinessContext => "single_word_business_context",
            NameMatchType::SingleWordNoContext => "single_word_no_context",
            NameMatchType::HighRiskSingleWordWithContext => "high_risk_single_word_with_context",
            NameMatchType::HighRiskSingleWordNoContext => "high_risk_single_word_no_context",
            NameMatchType::SingleWordGenericOrNotFound => "single_word_generic_or_not_found",
            NameMatchType::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for NameMatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NameSimilarityResult {
    pub score: f64,
    pub match_type: NameMatchType,
}

/// Full verification verdict for one company mention.
///
/// Field semantics:
/// - is_verified: confidence cleared the threshold for this name class
/// - note: human-readable trace of every scoring step
/// - domain_verified: a company domain was found in the fetched content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VerificationVerdict {
    pub is_verified: bool,
    pub confidence: f64,
    pub note: String,
    pub domain_verified: bool,
    pub name_similarity: NameSimilarityResult,
    pub is_person_name: bool,
    pub is_high_risk_single_word: bool,
}

/// Which backend produced an entity resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationSource {
    Heuristic,
    GoogleKnowledgeGraph,
    Wikidata,
}

impl fmt::Display for DisambiguationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DisambiguationSource::Heuristic => "heuristic",
            DisambiguationSource::GoogleKnowledgeGraph => "google_knowledge_graph",
            DisambiguationSource::Wikidata => "wikidata",
        };
        write!(f, "{label}")
    }
}

/// Entity resolution for a company name against a knowledge base.
///
/// Enriches delivery output only; the verification verdict stands on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DisambiguationResult {
    pub entity_name: String,
    pub is_verified: bool,
    pub confidence: f64,
    pub entity_types: Vec<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: DisambiguationSource,
}

impl DisambiguationResult {
    pub fn unresolved(
        name: impl Into<String>,
        confidence: f64,
        description: impl Into<String>,
        source: DisambiguationSource,
    ) -> Self {
        Self {
            entity_name: name.into(),
            is_verified: false,
            confidence,
            entity_types: Vec::new(),
            description: Some(description.into()),
            url: None,
            source,
        }
    }
}
