use crate::core::resolver::{CreateOutcome, MatchStore, StoreError, SwipeStore};
use crate::models::{CompatibilityScore, Match, MatchKey, MatchStatus, MatchType, SwipeRecord};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<PostgresError> for StoreError {
    fn from(value: PostgresError) -> Self {
        match value {
            PostgresError::NotFound(msg) => StoreError::NotFound(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// PostgreSQL-backed swipe ledger and match store.
///
/// The swipe table is append-only; reciprocity checks read the latest row
/// per directed pair. The match table carries a unique constraint on the
/// canonical key, and `INSERT ... ON CONFLICT DO NOTHING` is the atomic
/// conditional create the resolver relies on. It holds across processes
/// and machines with no application-level locking.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");
        Self::new(url, max_connections.unwrap_or(10), min_connections.unwrap_or(1)).await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn swipe_from_row(row: &sqlx::postgres::PgRow) -> SwipeRecord {
        SwipeRecord {
            id: row.get("id"),
            actor_id: row.get("actor_id"),
            target_id: row.get("target_id"),
            action: row.get("action"),
            match_type: row.get("match_type"),
            created_at: row.get("created_at"),
        }
    }

    fn match_from_row(row: &sqlx::postgres::PgRow) -> Match {
        let compatibility: sqlx::types::Json<CompatibilityScore> = row.get("compatibility");
        Match {
            id: row.get("id"),
            user_a: row.get("user_a"),
            user_b: row.get("user_b"),
            match_type: row.get("match_type"),
            status: MatchStatus::Matched,
            compatibility: compatibility.0,
            icebreakers: row.get("icebreakers"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl SwipeStore for PgStore {
    async fn append_swipe(&self, record: &SwipeRecord) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO swipes (id, actor_id, target_id, action, match_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(&record.id)
            .bind(&record.actor_id)
            .bind(&record.target_id)
            .bind(record.action)
            .bind(record.match_type)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        tracing::debug!(
            "Appended swipe {}: {} -> {}",
            record.id,
            record.actor_id,
            record.target_id
        );

        Ok(())
    }

    async fn find_latest_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        match_type: MatchType,
    ) -> Result<Option<SwipeRecord>, StoreError> {
        let query = r#"
            SELECT id, actor_id, target_id, action, match_type, created_at
            FROM swipes
            WHERE actor_id = $1 AND target_id = $2 AND match_type = $3
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(actor_id)
            .bind(target_id)
            .bind(match_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        Ok(row.as_ref().map(Self::swipe_from_row))
    }

    async fn list_swipes(
        &self,
        user_id: &str,
        match_type: Option<MatchType>,
    ) -> Result<Vec<SwipeRecord>, StoreError> {
        let query = r#"
            SELECT id, actor_id, target_id, action, match_type, created_at
            FROM swipes
            WHERE actor_id = $1 AND ($2::match_type IS NULL OR match_type = $2)
            ORDER BY created_at DESC, id DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(match_type)
            .fetch_all(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        Ok(rows.iter().map(Self::swipe_from_row).collect())
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn create_match_if_absent(&self, candidate: Match) -> Result<CreateOutcome, StoreError> {
        let insert = r#"
            INSERT INTO matches (id, user_a, user_b, match_type, compatibility, icebreakers, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_a, user_b, match_type) DO NOTHING
        "#;

        let result = sqlx::query(insert)
            .bind(&candidate.id)
            .bind(&candidate.user_a)
            .bind(&candidate.user_b)
            .bind(candidate.match_type)
            .bind(sqlx::types::Json(&candidate.compatibility))
            .bind(&candidate.icebreakers)
            .bind(candidate.created_at)
            .execute(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        if result.rows_affected() == 1 {
            return Ok(CreateOutcome {
                created: true,
                match_record: candidate,
            });
        }

        // Lost the conditional create; read back the winner's record.
        // Matches are never deleted, so the read must succeed.
        let existing = self
            .get_match(&candidate.key())
            .await?
            .ok_or_else(|| StoreError::Unavailable("match vanished after conflict".into()))?;

        Ok(CreateOutcome {
            created: false,
            match_record: existing,
        })
    }

    async fn get_match(&self, key: &MatchKey) -> Result<Option<Match>, StoreError> {
        let query = r#"
            SELECT id, user_a, user_b, match_type, compatibility, icebreakers, created_at
            FROM matches
            WHERE user_a = $1 AND user_b = $2 AND match_type = $3
        "#;

        let row = sqlx::query(query)
            .bind(&key.user_a)
            .bind(&key.user_b)
            .bind(key.match_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        Ok(row.as_ref().map(Self::match_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_error_maps_to_store_error() {
        let err: StoreError = PostgresError::NotFound("profile x".into()).into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
