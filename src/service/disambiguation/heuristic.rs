use super::EntityDisambiguator;
use crate::model::{DisambiguationResult, DisambiguationSource};
use crate::service::lexicon::Lexicons;
use async_trait::async_trait;
use std::sync::Arc;

/// Heuristic confidence at or above which a resolution would verify.
/// The heuristic tiers top out at 0.5, so this backend never verifies
/// on its own.
const VERIFY_THRESHOLD: f64 = 0.6;

/// Offline fallback backend built on the lexicons alone
pub struct HeuristicDisambiguator {
    lexicons: Arc<Lexicons>,
}

impl HeuristicDisambiguator {
    pub fn new(lexicons: Arc<Lexicons>) -> Self {
        Self { lexicons }
    }
}

#[async_trait]
impl EntityDisambiguator for HeuristicDisambiguator {
    async fn resolve(&self, name: &str, context: &str) -> DisambiguationResult {
        let trimmed = name.trim();
        let single_word = !trimmed.contains(' ');

        let (confidence, description) = if single_word && self.lexicons.is_generic(trimmed) {
            (0.0, "generic term, not resolvable without stronger evidence")
        } else if self.lexicons.is_likely_person_name(trimmed) {
            (0.1, "name shape suggests a person, not a company")
        } else if self.lexicons.business_context(context).is_present() {
            (0.5, "business context around the mention")
        } else {
            (0.2, "no corroborating evidence")
        };

        DisambiguationResult {
            entity_name: trimmed.to_string(),
            is_verified: confidence >= VERIFY_THRESHOLD,
            confidence,
            entity_types: Vec::new(),
            description: Some(description.to_string()),
            url: None,
            source: DisambiguationSource::Heuristic,
        }
    }

    fn backend(&self) -> DisambiguationSource {
        DisambiguationSource::Heuristic
    }
}
