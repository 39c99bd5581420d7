//! Scan orchestration: feed items in, verified events out.
//!
//! For every watch-list company the pipeline queries the configured feeds,
//! gates each item on name match and severity, verifies the mention, labels
//! tone, persists, and delivers. Items that fail a gate are counted and
//! dropped; a failing step never aborts the scan.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::db::NewsEventRepository;
use crate::model::{CompanyRecord, Config, FeedItem, NewsEvent};
use crate::retriever::{ArticleFetcher, ContentFetcher, FeedDispatcher};
use crate::service::delivery::SlackDelivery;
use crate::service::disambiguation::{self, EntityDisambiguator};
use crate::service::event::{EventClassifier, score_severity};
use crate::service::lexicon::Lexicons;
use crate::service::matcher::NameMatcher;
use crate::service::tone::ToneAnalyzer;
use crate::service::verify::MentionVerifier;

/// Outcome counters for one scan run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScanSummary {
    pub companies: usize,
    pub items_seen: usize,
    pub duplicates: usize,
    pub below_match_threshold: usize,
    pub below_severity_threshold: usize,
    pub matched: usize,
    pub persisted: usize,
    pub delivered: usize,
}

/// End-to-end mention scanning over the watch list
pub struct PipelineService {
    matcher: NameMatcher,
    classifier: EventClassifier,
    verifier: MentionVerifier,
    tone: ToneAnalyzer,
    disambiguator: Arc<dyn EntityDisambiguator>,
    feeds: FeedDispatcher,
    repository: NewsEventRepository,
    delivery: Option<SlackDelivery>,
    config: Config,
}

impl PipelineService {
    pub fn new(config: Config, repository: NewsEventRepository, feeds: FeedDispatcher) -> Self {
        let lexicons = Arc::new(Lexicons::standard());
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(ArticleFetcher::new());
        let disambiguator = disambiguation::from_config(&config, Arc::clone(&lexicons));
        let delivery = config.slack_webhook_url.clone().map(SlackDelivery::new);

        Self {
            matcher: NameMatcher::new(),
            classifier: EventClassifier::new(),
            verifier: MentionVerifier::new(Arc::clone(&lexicons), fetcher),
            tone: ToneAnalyzer::new(lexicons),
            disambiguator,
            feeds,
            repository,
            delivery,
            config,
        }
    }

    /// Scan the given companies over the feed horizon
    pub async fn scan(&self, companies: &[CompanyRecord], since_days: i64) -> ScanSummary {
        let since = Utc::now() - Duration::days(since_days);
        let mut summary = ScanSummary {
            companies: companies.len(),
            ..Default::default()
        };

        for company in companies {
            let items = self.collect_items(company, since).await;
            tracing::info!(company = %company.name, items = items.len(), "Collected feed items");

            for item in items {
                summary.items_seen += 1;
                self.process_item(company, &item, &mut summary).await;
            }
        }

        tracing::info!(
            companies = summary.companies,
            items_seen = summary.items_seen,
            duplicates = summary.duplicates,
            matched = summary.matched,
            persisted = summary.persisted,
            delivered = summary.delivered,
            "Scan complete"
        );

        summary
    }

    /// One query per company name (quoted) plus one per registered domain
    async fn collect_items(&self, company: &CompanyRecord, since: DateTime<Utc>) -> Vec<FeedItem> {
        let mut queries = vec![format!("\"{}\"", company.name)];
        queries.extend(company.domains.iter().cloned());

        let results =
            futures::future::join_all(queries.iter().map(|q| self.feeds.search_all(q, since)))
                .await;

        results.into_iter().flatten().collect()
    }

    async fn process_item(
        &self,
        company: &CompanyRecord,
        item: &FeedItem,
        summary: &mut ScanSummary,
    ) {
        if item.url.is_empty() {
            tracing::debug!(company = %company.name, title = %item.title, "Skipping item without URL");
            return;
        }

        match self.repository.seen(&item.url).await {
            Ok(true) => {
                summary.duplicates += 1;
                return;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(url = %item.url, error = %e, "Dedup check failed, skipping item");
                return;
            }
        }

        let candidates = vec![company.name.clone()];
        let candidate = self.matcher.best_match(&item.title, &candidates);
        if candidate.matched_name.as_deref() != Some(company.name.as_str())
            || candidate.score < self.config.min_confidence
        {
            summary.below_match_threshold += 1;
            tracing::debug!(
                company = %company.name,
                title = %item.title,
                score = candidate.score,
                "Name match below threshold"
            );
            return;
        }

        let classification = self.classifier.classify(&item.title, "");

        let source_domain = Url::parse(&item.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        let severity = score_severity(classification.event_type, &source_domain);
        if severity < self.config.min_severity {
            summary.below_severity_threshold += 1;
            tracing::debug!(
                company = %company.name,
                event_type = %classification.event_type,
                severity,
                "Severity below threshold"
            );
            return;
        }
        summary.matched += 1;

        let verdict = self
            .verifier
            .verify(
                &company.name,
                &company.domains,
                &item.url,
                &item.title,
                self.config.offline,
            )
            .await;

        let tone = self.tone.analyze(&item.title, "");

        let event = NewsEvent {
            id: None,
            created_at: Utc::now(),
            published_at: item.published_at,
            company_name: company.name.clone(),
            company_location: company.primary_location().map(|l| l.name.clone()),
            title: item.title.clone(),
            url: item.url.clone(),
            source: item.source.clone(),
            event_type: classification.event_type,
            severity,
            confidence: candidate.score,
            evidence: Some(item.url.clone()),
            is_verified: verdict.is_verified,
            verification_note: Some(verdict.note.clone()),
            verification_confidence: Some(verdict.confidence),
            tone: tone.tone,
            tone_confidence: tone.confidence,
        };

        let inserted = match self.repository.insert(&event).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::warn!(url = %item.url, error = %e, "Failed to persist event");
                return;
            }
        };
        if !inserted {
            summary.duplicates += 1;
            return;
        }
        summary.persisted += 1;

        let resolution = self.disambiguator.resolve(&company.name, &item.title).await;
        tracing::debug!(
            company = %company.name,
            resolved = resolution.is_verified,
            resolution_confidence = resolution.confidence,
            backend = %resolution.source,
            "Resolved entity"
        );

        if let Some(delivery) = &self.delivery {
            if verdict.is_verified || self.config.notify_unverified {
                match delivery.post_event(&event, Some(&resolution)).await {
                    Ok(()) => summary.delivered += 1,
                    Err(e) => {
                        tracing::warn!(company = %company.name, error = %e, "Slack delivery failed");
                    }
                }
            }
        }
    }
}
