//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::NewsEventRepository;
use crate::model::{CompanyRecord, Config};
use crate::retriever::FeedDispatcher;
use crate::service::{Lexicons, PipelineService};

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers.
pub struct AppState {
    /// Runtime configuration
    pub config: Config,
    /// Database connection pool
    pub db_pool: SqlitePool,
    /// News event repository
    pub repository: NewsEventRepository,
    /// Watch-list companies loaded at startup
    pub companies: Vec<CompanyRecord>,
    /// Scan pipeline
    pub pipeline: Arc<PipelineService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Watch-list registry load (fatal when the CSV is missing)
    /// 3. Feed and pipeline construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool(&config.db_path)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let lexicons = Lexicons::standard();
        let companies = crate::service::registry::load_companies(&config.companies_csv, &lexicons)
            .map_err(|e| AppError::RegistryInit(e.to_string()))?;

        let repository = NewsEventRepository::new(db_pool.clone());
        let feeds = FeedDispatcher::new(&config);
        let pipeline = Arc::new(PipelineService::new(
            config.clone(),
            repository.clone(),
            feeds,
        ));

        Ok(Self {
            config,
            db_pool,
            repository,
            companies,
            pipeline,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Watch-list registry failed to load
    #[error("Registry initialization failed: {0}")]
    RegistryInit(String),
}
