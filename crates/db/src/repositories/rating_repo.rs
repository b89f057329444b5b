//! Repository for the `ratings` table.
//!
//! Every mutation here changes what `tools.average_rating` and
//! `tools.rating_count` must say, so create/update/soft-delete each run in
//! a transaction that ends with [`ToolAggregates::recompute_rating`]. If
//! the recompute fails (e.g. the tool row is gone), the rating write rolls
//! back with it.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::aggregates::ToolAggregates;
use crate::models::rating::{
    CreateRating, Rating, RatingSummary, RatingWithAuthor, RatingWithTool, UpdateRating,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tool_id, user_id, rating, comment, deleted_at, created_at, updated_at";

/// Default page size for rating listings.
const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for rating listings.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a new rating and recompute the tool's counters, atomically.
    ///
    /// The partial unique index `uq_ratings_user_tool` rejects a second
    /// live rating from the same user (classified to 409 upstream).
    pub async fn create(pool: &PgPool, input: &CreateRating, user_id: DbId) -> Result<Rating, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO ratings (tool_id, user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Rating>(&query)
            .bind(input.tool_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        ToolAggregates::recompute_rating(&mut *tx, input.tool_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Edit a rating in place (value and/or text) and recompute, atomically.
    ///
    /// Scoped to the owning user; returns `None` when the rating does not
    /// exist, is deleted, or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateRating,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE ratings SET rating = $3, comment = $4
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        ToolAggregates::recompute_rating(&mut *tx, row.tool_id).await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Soft-delete a rating and recompute, atomically. Scoped to the
    /// owning user; returns the affected `tool_id` when a row was deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE ratings SET deleted_at = NOW()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING tool_id",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((tool_id,)) = row else {
            return Ok(None);
        };

        ToolAggregates::recompute_rating(&mut *tx, tool_id).await?;

        tx.commit().await?;
        Ok(Some(tool_id))
    }

    /// Find the caller's live rating for a tool, if any.
    pub async fn find_by_user_and_tool(
        pool: &PgPool,
        user_id: DbId,
        tool_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ratings
             WHERE user_id = $1 AND tool_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(user_id)
            .bind(tool_id)
            .fetch_optional(pool)
            .await
    }

    /// Average, total, and star histogram over a tool's live ratings.
    pub async fn summary(pool: &PgPool, tool_id: DbId) -> Result<RatingSummary, sqlx::Error> {
        let row: (f64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 2)::float8, 0),
                    COUNT(*),
                    COUNT(*) FILTER (WHERE rating = 1),
                    COUNT(*) FILTER (WHERE rating = 2),
                    COUNT(*) FILTER (WHERE rating = 3),
                    COUNT(*) FILTER (WHERE rating = 4),
                    COUNT(*) FILTER (WHERE rating = 5)
             FROM ratings
             WHERE tool_id = $1 AND deleted_at IS NULL",
        )
        .bind(tool_id)
        .fetch_one(pool)
        .await?;

        Ok(RatingSummary {
            average_rating: row.0,
            total_ratings: row.1,
            distribution: [row.2, row.3, row.4, row.5, row.6],
        })
    }

    /// Most recent live ratings for a tool, with author info.
    pub async fn list_recent_for_tool(
        pool: &PgPool,
        tool_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RatingWithAuthor>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        sqlx::query_as::<_, RatingWithAuthor>(
            "SELECT r.id, r.tool_id, r.user_id, r.rating, r.comment, r.created_at,
                    u.username, u.avatar AS user_avatar
             FROM ratings r
             JOIN users u ON u.id = r.user_id
             WHERE r.tool_id = $1 AND r.deleted_at IS NULL
             ORDER BY r.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(tool_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// A user's live ratings, newest first, with tool info.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RatingWithTool>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        sqlx::query_as::<_, RatingWithTool>(
            "SELECT r.id, r.tool_id, r.rating, r.comment, r.created_at,
                    t.name AS tool_name, t.description AS tool_description
             FROM ratings r
             JOIN tools t ON t.id = r.tool_id
             WHERE r.user_id = $1 AND r.deleted_at IS NULL
             ORDER BY r.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Site-wide rating summary across all tools.
    pub async fn global_summary(pool: &PgPool) -> Result<RatingSummary, sqlx::Error> {
        let row: (f64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 2)::float8, 0),
                    COUNT(*),
                    COUNT(*) FILTER (WHERE rating = 1),
                    COUNT(*) FILTER (WHERE rating = 2),
                    COUNT(*) FILTER (WHERE rating = 3),
                    COUNT(*) FILTER (WHERE rating = 4),
                    COUNT(*) FILTER (WHERE rating = 5)
             FROM ratings
             WHERE deleted_at IS NULL",
        )
        .fetch_one(pool)
        .await?;

        Ok(RatingSummary {
            average_rating: row.0,
            total_ratings: row.1,
            distribution: [row.2, row.3, row.4, row.5, row.6],
        })
    }
}
