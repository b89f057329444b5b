//! Repository for the `favorites` table.
//!
//! Like ratings, favorite mutations change a derived counter on the tool
//! (`favorite_count`), so create and soft-delete run in a transaction
//! ending with [`ToolAggregates::recompute_favorites`].

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::aggregates::ToolAggregates;
use crate::models::favorite::{
    CreateFavorite, Favorite, FavoriteListParams, FavoriteStats, FavoriteWithTool,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, tool_id, user_id, folder_id, notes, deleted_at, created_at, updated_at";

/// Default page size for favorite listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for favorite listings.
const MAX_LIMIT: i64 = 100;

/// Sort columns accepted by the favorites listing.
const SORTABLE: &[&str] = &["created_at", "name", "average_rating", "view_count", "favorite_count"];

/// Provides CRUD operations for favorites.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Insert a favorite and recompute the tool's counter, atomically.
    ///
    /// Duplicate live favorites are rejected by `uq_favorites_user_tool`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFavorite,
        user_id: DbId,
    ) -> Result<Favorite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO favorites (tool_id, user_id, folder_id, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Favorite>(&query)
            .bind(input.tool_id)
            .bind(user_id)
            .bind(input.folder_id)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        ToolAggregates::recompute_favorites(&mut *tx, input.tool_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Soft-delete a favorite by ID and recompute, atomically. Scoped to
    /// the owning user; returns the affected `tool_id` when a row was
    /// deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE favorites SET deleted_at = NOW()
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

        ToolAggregates::recompute_favorites(&mut *tx, tool_id).await?;

        tx.commit().await?;
        Ok(Some(tool_id))
    }

    /// Soft-delete by (user, tool) instead of favorite ID; used by the
    /// batch endpoint. Returns `true` if a live favorite was removed.
    pub async fn soft_delete_by_tool(
        pool: &PgPool,
        user_id: DbId,
        tool_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE favorites SET deleted_at = NOW()
             WHERE user_id = $1 AND tool_id = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(tool_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        ToolAggregates::recompute_favorites(&mut *tx, tool_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Find the caller's live favorite for a tool, if any.
    pub async fn find_by_user_and_tool(
        pool: &PgPool,
        user_id: DbId,
        tool_id: DbId,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM favorites
             WHERE user_id = $1 AND tool_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Favorite>(&query)
            .bind(user_id)
            .bind(tool_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a live favorite into a folder (or out, with `None`).
    /// Scoped to the owning user and tool.
    pub async fn set_folder(
        pool: &PgPool,
        user_id: DbId,
        tool_id: DbId,
        folder_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE favorites SET folder_id = $3
             WHERE user_id = $1 AND tool_id = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(tool_id)
        .bind(folder_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's live favorites joined with their (approved, live)
    /// tools, with category filter, sorting, and pagination.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        params: &FavoriteListParams,
    ) -> Result<Vec<FavoriteWithTool>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let sort_by = match params.sort_by.as_deref() {
            Some("created_at") | None => "f.created_at".to_string(),
            Some(s) if SORTABLE.contains(&s) => format!("t.{s}"),
            Some(_) => "f.created_at".to_string(),
        };
        let order = match params.order.as_deref() {
            Some(o) if o.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        let base = format!(
            "SELECT f.id, f.tool_id, f.folder_id, f.notes, f.created_at,
                    t.name, t.description, t.category, t.website, t.pricing,
                    t.average_rating, t.rating_count, t.view_count, t.favorite_count
             FROM favorites f
             JOIN tools t ON t.id = f.tool_id
             WHERE f.user_id = $1 AND f.deleted_at IS NULL
               AND t.deleted_at IS NULL AND t.status = 'approved'"
        );

        match &params.category {
            Some(category) => {
                let query =
                    format!("{base} AND t.category = $2 ORDER BY {sort_by} {order} LIMIT $3 OFFSET $4");
                sqlx::query_as::<_, FavoriteWithTool>(&query)
                    .bind(user_id)
                    .bind(category)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("{base} ORDER BY {sort_by} {order} LIMIT $2 OFFSET $3");
                sqlx::query_as::<_, FavoriteWithTool>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List the live favorites filed under one folder, newest first.
    pub async fn list_for_folder(
        pool: &PgPool,
        user_id: DbId,
        folder_id: DbId,
    ) -> Result<Vec<FavoriteWithTool>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteWithTool>(
            "SELECT f.id, f.tool_id, f.folder_id, f.notes, f.created_at,
                    t.name, t.description, t.category, t.website, t.pricing,
                    t.average_rating, t.rating_count, t.view_count, t.favorite_count
             FROM favorites f
             JOIN tools t ON t.id = f.tool_id
             WHERE f.user_id = $1 AND f.folder_id = $2 AND f.deleted_at IS NULL
               AND t.deleted_at IS NULL AND t.status = 'approved'
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(pool)
        .await
    }

    /// Count a user's live favorites (approved tools only), matching the
    /// listing filter.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        category: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM favorites f
             JOIN tools t ON t.id = f.tool_id
             WHERE f.user_id = $1 AND f.deleted_at IS NULL
               AND t.deleted_at IS NULL AND t.status = 'approved'
               AND ($2::text IS NULL OR t.category = $2)",
        )
        .bind(user_id)
        .bind(category)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Per-user favorite statistics: totals, distinct categories, and the
    /// mean rating of favorited tools.
    pub async fn stats_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<FavoriteStats, sqlx::Error> {
        sqlx::query_as::<_, FavoriteStats>(
            "SELECT COUNT(*) AS total_favorites,
                    COUNT(DISTINCT t.category) AS categories_count,
                    COALESCE(ROUND(AVG(t.average_rating)::numeric, 2)::float8, 0) AS avg_rating
             FROM favorites f
             JOIN tools t ON t.id = f.tool_id
             WHERE f.user_id = $1 AND f.deleted_at IS NULL AND t.deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
