use super::{
    is_verified_confidence, score_candidate, CandidateSignals, DisambiguationError,
    EntityDisambiguator, HeuristicDisambiguator,
};
use crate::model::{DisambiguationResult, DisambiguationSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const KG_SEARCH_URL: &str = "https://kgsearch.googleapis.com/v1/entities:search";
const CANDIDATE_LIMIT: u32 = 5;

/// Knowledge Graph schema.org types that denote a business
const BUSINESS_ENTITY_TYPES: &[&str] = &[
    "Corporation",
    "Organization",
    "LocalBusiness",
    "EducationalOrganization",
];

/// Google Knowledge Graph backend with heuristic fallback
pub struct GoogleKnowledgeGraphDisambiguator {
    client: Client,
    api_key: String,
    fallback: HeuristicDisambiguator,
}

#[derive(Debug, Deserialize)]
struct KgResponse {
    #[serde(rename = "itemListElement", default)]
    item_list_element: Vec<KgElement>,
}

#[derive(Debug, Deserialize)]
struct KgElement {
    result: Option<KgEntity>,
}

#[derive(Debug, Deserialize)]
struct KgEntity {
    name: Option<String>,
    #[serde(rename = "@type", default)]
    entity_types: Vec<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "detailedDescription")]
    detailed_description: Option<KgDetailedDescription>,
}

#[derive(Debug, Deserialize)]
struct KgDetailedDescription {
    #[serde(rename = "articleBody")]
    article_body: Option<String>,
}

impl GoogleKnowledgeGraphDisambiguator {
    pub fn new(api_key: String, fallback: HeuristicDisambiguator) -> Self {
        Self {
            client: Client::new(),
            api_key,
            fallback,
        }
    }

    async fn search(
        &self,
        name: &str,
        context: &str,
    ) -> Result<DisambiguationResult, DisambiguationError> {
        tracing::debug!(name = %name, "Querying Google Knowledge Graph");

        let response = self
            .client
            .get(KG_SEARCH_URL)
            .query(&[
                ("query", name),
                ("key", self.api_key.as_str()),
                ("limit", &CANDIDATE_LIMIT.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisambiguationError::UnexpectedStatus(status));
        }

        let parsed: KgResponse = response.json().await?;
        Ok(best_candidate(name, context, parsed).unwrap_or_else(|| {
            DisambiguationResult::unresolved(
                name,
                0.0,
                "no matching entities found",
                DisambiguationSource::GoogleKnowledgeGraph,
            )
        }))
    }
}

/// Pick the best-scoring candidate, first wins ties
fn best_candidate(
    name: &str,
    context: &str,
    response: KgResponse,
) -> Option<DisambiguationResult> {
    let mut best: Option<DisambiguationResult> = None;

    for element in response.item_list_element {
        let entity = match element.result {
            Some(entity) => entity,
            None => continue,
        };
        let entity_name = entity.name.unwrap_or_default();
        if entity_name.is_empty() {
            continue;
        }

        let article_body = entity
            .detailed_description
            .as_ref()
            .and_then(|d| d.article_body.clone());
        let description = match (&entity.description, &article_body) {
            (Some(short), Some(body)) => Some(format!("{short}. {body}")),
            (Some(short), None) => Some(short.clone()),
            (None, Some(body)) => Some(body.clone()),
            (None, None) => None,
        };

        let has_business_type = entity
            .entity_types
            .iter()
            .any(|t| BUSINESS_ENTITY_TYPES.contains(&t.as_str()));

        let confidence = score_candidate(
            name,
            context,
            &CandidateSignals {
                name: &entity_name,
                has_business_type,
                description: description.as_deref(),
            },
        );

        if best
            .as_ref()
            .map(|b| confidence > b.confidence)
            .unwrap_or(true)
        {
            best = Some(DisambiguationResult {
                entity_name,
                is_verified: is_verified_confidence(confidence),
                confidence,
                entity_types: entity.entity_types,
                description,
                url: entity.url,
                source: DisambiguationSource::GoogleKnowledgeGraph,
            });
        }
    }

    best
}

#[async_trait]
impl EntityDisambiguator for GoogleKnowledgeGraphDisambiguator {
    async fn resolve(&self, name: &str, context: &str) -> DisambiguationResult {
        match self.search(name, context).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Knowledge Graph lookup failed, falling back to heuristic");
                self.fallback.resolve(name, context).await
            }
        }
    }

    fn backend(&self) -> DisambiguationSource {
        DisambiguationSource::GoogleKnowledgeGraph
    }
}
