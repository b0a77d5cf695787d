use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors raised by any store backend
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    /// A uniqueness constraint rejected the write
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a driver error to `Duplicate` when it is a unique-index violation
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DatabaseError::Duplicate(what.to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Schema for the Postgres backend. Contact fields and user memberships are
/// stored as JSONB documents; the scope index closes the create race.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS complexes (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        address     TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS buildings (
        id          UUID PRIMARY KEY,
        complex_id  UUID NOT NULL REFERENCES complexes (id) ON DELETE CASCADE,
        name        TEXT NOT NULL,
        address     TEXT,
        position    SERIAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contact_info (
        id          UUID PRIMARY KEY,
        complex_id  UUID NOT NULL,
        building_id UUID,
        fields      JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS contact_info_scope_idx
        ON contact_info (complex_id, COALESCE(building_id, '00000000-0000-0000-0000-000000000000'::uuid))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id          UUID PRIMARY KEY,
        complex_id  UUID NOT NULL,
        author_id   UUID NOT NULL,
        title       TEXT NOT NULL,
        body        TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS notifications_complex_idx
        ON notifications (complex_id, created_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        is_admin    BOOLEAN NOT NULL DEFAULT false,
        buildings   JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Connection and schema bootstrap for the Postgres backend
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against the configured database url
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Create tables and indexes that do not exist yet
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema is up to date ({} statements)", SCHEMA.len());
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
