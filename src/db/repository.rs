//! Repository for news event database operations

use sqlx::SqlitePool;

use super::DbError;
use super::models::{ListEventsQuery, NewsEventRow, PaginatedEvents};
use crate::model::NewsEvent;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Repository for news event operations
#[derive(Clone)]
pub struct NewsEventRepository {
    pool: SqlitePool,
}

impl NewsEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a news event unless its URL was already recorded.
    /// Returns true if the event was inserted, false if the URL was seen before.
    pub async fn insert(&self, event: &NewsEvent) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (
                created_at, published_at, company_name, company_location,
                title, url, source, event_type, severity, confidence, evidence,
                is_verified, verification_note, verification_confidence,
                tone, tone_confidence
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(event.created_at)
        .bind(event.published_at)
        .bind(&event.company_name)
        .bind(&event.company_location)
        .bind(&event.title)
        .bind(&event.url)
        .bind(&event.source)
        .bind(event.event_type.as_str())
        .bind(event.severity)
        .bind(event.confidence)
        .bind(&event.evidence)
        .bind(event.is_verified)
        .bind(&event.verification_note)
        .bind(event.verification_confidence)
        .bind(event.tone.as_str())
        .bind(event.tone_confidence)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            tracing::debug!(url = %event.url, company = %event.company_name, "Inserted news event");
        }

        Ok(inserted)
    }

    /// Check if a URL has already been recorded
    pub async fn seen(&self, url: &str) -> Result<bool, DbError> {
        let result: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM events WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }

    /// Get a news event by ID
    pub async fn get_by_id(&self, id: i64) -> Result<NewsEvent, DbError> {
        let row: NewsEventRow = sqlx::query_as(
            r#"
            SELECT * FROM events WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        Ok(row.into_domain())
    }

    /// List news events with pagination and filters
    pub async fn list(&self, query: ListEventsQuery) -> Result<PaginatedEvents, DbError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(100);
        let offset = (page - 1) * page_size;

        // Build dynamic query
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref company) = query.company {
            params.push(company.clone());
            conditions.push("company_name = ?");
        }

        if let Some(ref event_type) = query.event_type {
            params.push(event_type.clone());
            conditions.push("event_type = ?");
        }

        if query.verified_only {
            conditions.push("is_verified = 1");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Get total count
        let count_query = format!("SELECT COUNT(*) as count FROM events {}", where_clause);

        let total_count: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_one(&self.pool).await?
        };

        // Get events
        let select_query = format!(
            r#"
            SELECT * FROM events
            {}
            ORDER BY created_at DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, page_size, offset
        );

        let rows: Vec<NewsEventRow> = {
            let mut q = sqlx::query_as(&select_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_all(&self.pool).await?
        };

        let events: Vec<NewsEvent> = rows.into_iter().map(|row| row.into_domain()).collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedEvents {
            events,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }
}
