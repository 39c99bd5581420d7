use super::{
    is_verified_confidence, score_candidate, CandidateSignals, DisambiguationError,
    EntityDisambiguator, HeuristicDisambiguator,
};
use crate::model::{DisambiguationResult, DisambiguationSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const WIKIDATA_API_URL: &str = "https://www.wikidata.org/w/api.php";
const CANDIDATE_LIMIT: u32 = 5;

/// Wikidata instance-of (P31) items that denote a business
const BUSINESS_INSTANCE_IDS: &[&str] = &[
    "Q4830453", // business
    "Q783794",  // company
    "Q891723",  // public company
    "Q6881511", // enterprise
    "Q43229",   // organization
];

/// Wikidata backend with heuristic fallback, no API key required
pub struct WikidataDisambiguator {
    client: Client,
    fallback: HeuristicDisambiguator,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchEntity>,
}

#[derive(Debug, Deserialize)]
struct SearchEntity {
    id: String,
    label: Option<String>,
    description: Option<String>,
    concepturi: Option<String>,
}

impl WikidataDisambiguator {
    pub fn new(fallback: HeuristicDisambiguator) -> Self {
        Self {
            client: Client::new(),
            fallback,
        }
    }

    async fn search(
        &self,
        name: &str,
        context: &str,
    ) -> Result<DisambiguationResult, DisambiguationError> {
        tracing::debug!(name = %name, "Querying Wikidata");

        let response = self
            .client
            .get(WIKIDATA_API_URL)
            .query(&[
                ("action", "wbsearchentities"),
                ("search", name),
                ("language", "en"),
                ("format", "json"),
                ("type", "item"),
                ("limit", &CANDIDATE_LIMIT.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisambiguationError::UnexpectedStatus(status));
        }

        let parsed: SearchResponse = response.json().await?;
        if parsed.search.is_empty() {
            return Ok(DisambiguationResult::unresolved(
                name,
                0.0,
                "no matching entities found",
                DisambiguationSource::Wikidata,
            ));
        }

        let instance_map = self.fetch_instance_ids(&parsed.search).await?;
        Ok(best_candidate(name, context, parsed.search, &instance_map))
    }

    /// Second call: P31 claims for all candidates at once
    async fn fetch_instance_ids(
        &self,
        candidates: &[SearchEntity],
    ) -> Result<HashMap<String, Vec<String>>, DisambiguationError> {
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        let response = self
            .client
            .get(WIKIDATA_API_URL)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", &ids.join("|")),
                ("props", "claims"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisambiguationError::UnexpectedStatus(status));
        }

        let body: serde_json::Value = response.json().await?;
        let mut map = HashMap::new();
        if let Some(entities) = body.get("entities").and_then(|e| e.as_object()) {
            for (id, entity) in entities {
                map.insert(id.clone(), instance_of_ids(entity));
            }
        }
        Ok(map)
    }
}

/// Extract P31 item ids from a wbgetentities entity value
fn instance_of_ids(entity: &serde_json::Value) -> Vec<String> {
    entity
        .pointer("/claims/P31")
        .and_then(|claims| claims.as_array())
        .map(|claims| {
            claims
                .iter()
                .filter_map(|claim| {
                    claim
                        .pointer("/mainsnak/datavalue/value/id")
                        .and_then(|id| id.as_str())
                        .map(String::from)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Pick the best-scoring candidate, first wins ties
fn best_candidate(
    name: &str,
    context: &str,
    candidates: Vec<SearchEntity>,
    instance_map: &HashMap<String, Vec<String>>,
) -> DisambiguationResult {
    let mut best: Option<DisambiguationResult> = None;

    for candidate in candidates {
        let label = match candidate.label {
            Some(label) if !label.is_empty() => label,
            _ => continue,
        };

        let instance_ids = instance_map
            .get(&candidate.id)
            .cloned()
            .unwrap_or_default();
        let has_business_type = instance_ids
            .iter()
            .any(|id| BUSINESS_INSTANCE_IDS.contains(&id.as_str()));

        let confidence = score_candidate(
            name,
            context,
            &CandidateSignals {
                name: &label,
                has_business_type,
                description: candidate.description.as_deref(),
            },
        );

        if best
            .as_ref()
            .map(|b| confidence > b.confidence)
            .unwrap_or(true)
        {
            best = Some(DisambiguationResult {
                entity_name: label,
                is_verified: is_verified_confidence(confidence),
                confidence,
                entity_types: instance_ids,
                description: candidate.description,
                url: candidate.concepturi,
                source: DisambiguationSource::Wikidata,
            });
        }
    }

    best.unwrap_or_else(|| {
        DisambiguationResult::unresolved(
            name,
            0.0,
            "no matching entities found",
            DisambiguationSource::Wikidata,
        )
    })
}

#[async_trait]
impl EntityDisambiguator for WikidataDisambiguator {
    async fn resolve(&self, name: &str, context: &str) -> DisambiguationResult {
        match self.search(name, context).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Wikidata lookup failed, falling back to heuristic");
                self.fallback.resolve(name, context).await
            }
        }
    }

    fn backend(&self) -> DisambiguationSource {
        DisambiguationSource::Wikidata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::lexicon::Lexicons;
    use std::sync::Arc;

    #[test]
    fn test_search_response_parsing() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{
                "search": [
                    {
                        "id": "Q95",
                        "label": "Google",
                        "description": "American technology company",
                        "concepturi": "http://www.wikidata.org/entity/Q95"
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.search.len(), 1);
        assert_eq!(parsed.search[0].id, "Q95");
        assert_eq!(parsed.search[0].label.as_deref(), Some("Google"));
    }

    #[test]
    fn test_instance_of_extraction() {
        let entity: serde_json::Value = serde_json::from_str(
            r#"{
                "claims": {
                    "P31": [
                        {"mainsnak": {"datavalue": {"value": {"id": "Q783794"}}}},
                        {"mainsnak": {"datavalue": {"value": {"id": "Q4830453"}}}}
                    ]
                }
            }"#,
        )
        .unwrap();
        let ids = instance_of_ids(&entity);
        assert_eq!(ids, vec!["Q783794".to_string(), "Q4830453".to_string()]);
    }

    #[test]
    fn test_instance_of_missing_claims() {
        let entity: serde_json::Value = serde_json::from_str(r#"{"claims": {}}"#).unwrap();
        assert!(instance_of_ids(&entity).is_empty());
    }

    #[test]
    fn test_best_candidate_scores_business_entity() {
        let candidates = vec![SearchEntity {
            id: "Q95".to_string(),
            label: Some("Google".to_string()),
            description: Some("American technology company".to_string()),
            concepturi: Some("http://www.wikidata.org/entity/Q95".to_string()),
        }];
        let mut instance_map = HashMap::new();
        instance_map.insert("Q95".to_string(), vec!["Q783794".to_string()]);

        let result = best_candidate("Google", "search technology", candidates, &instance_map);
        assert!(result.is_verified);
        assert!(result.confidence > 0.7);
        assert_eq!(result.source, DisambiguationSource::Wikidata);
        assert_eq!(result.entity_types, vec!["Q783794".to_string()]);
    }

    #[test]
    fn test_best_candidate_without_types_stays_unverified() {
        let candidates = vec![SearchEntity {
            id: "Q1".to_string(),
            label: Some("Acme".to_string()),
            description: Some("A fictional mountain".to_string()),
            concepturi: None,
        }];
        let result = best_candidate("Acme", "", candidates, &HashMap::new());
        assert!(!result.is_verified);
        assert!(result.confidence <= 0.4 + 1e-9);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_lookup() {
        let disambiguator =
            WikidataDisambiguator::new(HeuristicDisambiguator::new(Arc::new(Lexicons::standard())));
        let result = disambiguator
            .resolve("Google", "technology company search engine")
            .await;
        assert_eq!(result.source, DisambiguationSource::Wikidata);
        assert!(result.confidence > 0.0);
    }
}
