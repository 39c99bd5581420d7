//! Database module for SQLite persistence

pub mod models;
pub mod repository;

pub use repository::NewsEventRepository;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Create a new database connection pool backed by a file on disk
pub async fn create_pool(db_path: &str) -> Result<SqlitePool, DbError> {
    tracing::debug!(db_path = %db_path, "Opening SQLite database");

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    tracing::info!(db_path = %db_path, "SQLite connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
    // Create table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            published_at TEXT,
            company_name TEXT NOT NULL,
            company_location TEXT,
            title TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            source TEXT NOT NULL,
            event_type TEXT NOT NULL,
            severity REAL NOT NULL,
            confidence REAL NOT NULL,
            evidence TEXT,
            is_verified INTEGER NOT NULL DEFAULT 1,
            verification_note TEXT,
            verification_confidence REAL,
            tone TEXT NOT NULL DEFAULT 'NEUTRAL',
            tone_confidence REAL NOT NULL DEFAULT 0.5
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_company ON events(company_name)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_event_type ON events(event_type)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// In-memory pool for tests. A single connection keeps every query on the
/// same in-memory database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    init_schema(&pool).await.expect("Failed to initialize schema");

    pool
}
