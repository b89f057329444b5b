//! Repository for the `user_history` table.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::history::{ActionCount, HistoryEntry, HistoryListParams, TrackAction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, action, target_type, target_id, target_name, metadata, created_at";

/// Default page size for history listings.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for history listings.
const MAX_LIMIT: i64 = 200;

/// Window within which re-tracking the same action refreshes the existing
/// row instead of inserting a duplicate.
const DEDUP_WINDOW: &str = "1 hour";

/// Provides tracking and querying of user activity history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Record an action. If the same (action, target) was recorded for
    /// this user within the last hour, the existing row's timestamp is
    /// refreshed instead. Returns the affected entry.
    pub async fn track(
        pool: &PgPool,
        user_id: DbId,
        input: &TrackAction,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let refresh = format!(
            "UPDATE user_history SET created_at = NOW()
             WHERE id = (SELECT id FROM user_history
                          WHERE user_id = $1 AND action = $2 AND target_type = $3
                            AND target_id IS NOT DISTINCT FROM $4
                            AND target_name IS NOT DISTINCT FROM $5
                            AND created_at > NOW() - INTERVAL '{DEDUP_WINDOW}'
                          ORDER BY created_at DESC
                          LIMIT 1)
             RETURNING {COLUMNS}"
        );
        let refreshed = sqlx::query_as::<_, HistoryEntry>(&refresh)
            .bind(user_id)
            .bind(&input.action)
            .bind(&input.target_type)
            .bind(input.target_id)
            .bind(&input.target_name)
            .fetch_optional(pool)
            .await?;

        if let Some(entry) = refreshed {
            return Ok(entry);
        }

        let insert = format!(
            "INSERT INTO user_history (user_id, action, target_type, target_id, target_name, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryEntry>(&insert)
            .bind(user_id)
            .bind(&input.action)
            .bind(&input.target_type)
            .bind(input.target_id)
            .bind(&input.target_name)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// List a user's history, newest first, with optional action and
    /// target-type filters.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        params: &HistoryListParams,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM user_history
             WHERE user_id = $1
               AND ($2::text IS NULL OR action = $2)
               AND ($3::text IS NULL OR target_type = $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(user_id)
            .bind(&params.action)
            .bind(&params.target_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Per-action counts for the stats endpoint.
    pub async fn stats_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActionCount>, sqlx::Error> {
        sqlx::query_as::<_, ActionCount>(
            "SELECT action, COUNT(*) AS count
             FROM user_history
             WHERE user_id = $1
             GROUP BY action
             ORDER BY count DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete history rows, optionally only one action kind. Returns the
    /// number of rows removed. History rows are hard-deleted: nothing
    /// references them and "clear history" means gone.
    pub async fn clear_for_user(
        pool: &PgPool,
        user_id: DbId,
        action: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_history
             WHERE user_id = $1 AND ($2::text IS NULL OR action = $2)",
        )
        .bind(user_id)
        .bind(action)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Most recent entries across all users, for the admin activity feed.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_history
             ORDER BY created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most frequent search terms, for the search stats endpoint.
    pub async fn popular_search_terms(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT target_name, COUNT(*) AS count
             FROM user_history
             WHERE action = 'search' AND target_name IS NOT NULL
             GROUP BY target_name
             ORDER BY count DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Everything for a user, oldest first, for the export endpoint.
    pub async fn export_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_history
             WHERE user_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
