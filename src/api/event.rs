//! REST API endpoints for news events and scan triggering

use std::collections::HashSet;

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::db::DbError;
use crate::db::models::{ListEventsQuery, PaginatedEvents};
use crate::model::CompanyRecord;
use crate::service::ScanSummary;

/// Query parameters for listing events
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventsParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
    /// Filter by exact company name
    pub company: Option<String>,
    /// Filter by event type label (FUNDING, LAYOFFS, ...)
    pub event_type: Option<String>,
    /// Keep only verified mentions
    pub verified_only: Option<bool>,
}

/// Scan trigger request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Feed horizon override in days
    pub since_days: Option<i64>,
    /// Restrict the scan to these watch-list companies
    pub companies: Option<Vec<String>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        get_event,
        trigger_scan,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        crate::model::NewsEvent,
        crate::model::EventType,
        crate::model::Tone,
        PaginatedEvents,
        ScanRequest,
        ScanSummary,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth
    )),
    tags(
        (name = "events", description = "Verified company mention events"),
        (name = "health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

/// List news events with pagination and filters
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Events retrieved successfully", body = PaginatedEvents),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
#[get("/v1/events")]
pub async fn list_events(
    state: web::Data<AppState>,
    query: web::Query<ListEventsParams>,
) -> Result<HttpResponse, ApiError> {
    let db_query = ListEventsQuery {
        page: query.page,
        page_size: query.page_size,
        company: query.company.clone(),
        event_type: query.event_type.clone(),
        verified_only: query.verified_only.unwrap_or(false),
    };

    let paginated = state.repository.list(db_query).await?;
    Ok(HttpResponse::Ok().json(paginated))
}

/// Get a news event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event retrieved successfully", body = crate::model::NewsEvent),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
#[get("/v1/events/{id}")]
pub async fn get_event(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let event = state.repository.get_by_id(id).await.map_err(|e| match e {
        DbError::NotFound(_) => ApiError::EventNotFound(id),
        e => ApiError::Database(e.to_string()),
    })?;

    Ok(HttpResponse::Ok().json(event))
}

/// Run a scan over the watch list
///
/// An empty body scans every company over the configured horizon.
#[utoipa::path(
    post,
    path = "/v1/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan completed", body = ScanSummary),
        (status = 400, description = "Invalid request")
    ),
    tag = "events"
)]
#[post("/v1/scan")]
pub async fn trigger_scan(
    state: web::Data<AppState>,
    request: Option<web::Json<ScanRequest>>,
) -> Result<HttpResponse, ApiError> {
    let request = request.map(|r| r.into_inner()).unwrap_or_default();

    let since_days = request.since_days.unwrap_or(state.config.since_days);
    if since_days <= 0 {
        return Err(ApiError::BadRequest(format!(
            "since_days must be positive, got {}",
            since_days
        )));
    }

    let companies: Vec<CompanyRecord> = match &request.companies {
        Some(names) => {
            let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
            state
                .companies
                .iter()
                .filter(|c| wanted.contains(c.name.as_str()))
                .cloned()
                .collect()
        }
        None => state.companies.clone(),
    };

    if companies.is_empty() {
        return Err(ApiError::BadRequest(
            "no matching watch-list companies".to_string(),
        ));
    }

    tracing::info!(companies = companies.len(), since_days, "Scan triggered");

    let summary = state.pipeline.scan(&companies, since_days).await;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure event routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_events)
        .service(get_event)
        .service(trigger_scan);
}
