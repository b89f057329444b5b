//! Repository for the `tools` table.
//!
//! Covers submission, moderation, listing, and the directory-wide stats.
//! The derived counter columns are written only by [`crate::aggregates`].

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::tool::{
    CreateTool, Tool, ToolListParams, ToolStats, UpdateTool, STATUS_APPROVED, STATUS_PENDING,
    STATUS_REJECTED,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, category, tags, website, pricing, features, \
                        submitted_by, status, approved_by, approved_at, rejected_reason, \
                        view_count, rating_count, average_rating, favorite_count, \
                        deleted_at, created_at, updated_at";

/// Default page size for tool listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for tool listings.
const MAX_LIMIT: i64 = 100;

/// Sort columns the listing endpoint accepts. Anything else falls back to
/// `created_at`; the allowlist keeps user input out of the ORDER BY clause.
const SORTABLE: &[&str] = &[
    "created_at",
    "name",
    "average_rating",
    "view_count",
    "favorite_count",
];

/// Provides CRUD operations for tools.
pub struct ToolRepo;

impl ToolRepo {
    /// Insert a new submission with `pending` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTool,
        submitted_by: DbId,
    ) -> Result<Tool, sqlx::Error> {
        let query = format!(
            "INSERT INTO tools (name, description, category, tags, website, pricing, features, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(serde_json::json!(input.tags))
            .bind(&input.website)
            .bind(&input.pricing)
            .bind(serde_json::json!(input.features))
            .bind(submitted_by)
            .fetch_one(pool)
            .await
    }

    /// Find a tool by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tools WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tool that is live AND approved -- the only kind that may
    /// receive ratings, favorites, and comments.
    pub async fn find_approved(pool: &PgPool, id: DbId) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tools
             WHERE id = $1 AND status = '{STATUS_APPROVED}' AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List approved tools with optional category filter, sorting, and
    /// pagination.
    pub async fn list_approved(
        pool: &PgPool,
        params: &ToolListParams,
    ) -> Result<Vec<Tool>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let sort_by = match params.sort_by.as_deref() {
            Some(s) if SORTABLE.contains(&s) => s,
            _ => "created_at",
        };
        let order = match params.order.as_deref() {
            Some(o) if o.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        match &params.category {
            Some(category) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tools
                     WHERE status = '{STATUS_APPROVED}' AND deleted_at IS NULL AND category = $1
                     ORDER BY {sort_by} {order}
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Tool>(&query)
                    .bind(category)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tools
                     WHERE status = '{STATUS_APPROVED}' AND deleted_at IS NULL
                     ORDER BY {sort_by} {order}
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Tool>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List pending submissions for moderation, oldest first.
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tool>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tools
             WHERE status = '{STATUS_PENDING}' AND deleted_at IS NULL
             ORDER BY created_at ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Approve a pending submission.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        approved_by: DbId,
    ) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!(
            "UPDATE tools SET
                status = '{STATUS_APPROVED}',
                approved_by = $2,
                approved_at = NOW(),
                rejected_reason = NULL
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .bind(approved_by)
            .fetch_optional(pool)
            .await
    }

    /// Reject a pending submission with a reason.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!(
            "UPDATE tools SET
                status = '{STATUS_REJECTED}',
                rejected_reason = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Update a tool's editable fields. Only non-`None` fields in `input`
    /// are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTool,
    ) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!(
            "UPDATE tools SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                website = COALESCE($6, website),
                pricing = COALESCE($7, pricing),
                features = COALESCE($8, features)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.tags.as_ref().map(|t| serde_json::json!(t)))
            .bind(&input.website)
            .bind(&input.pricing)
            .bind(input.features.as_ref().map(|f| serde_json::json!(f)))
            .fetch_optional(pool)
            .await
    }

    /// Bump the view counter. A plain increment: views are append-only, so
    /// the recompute-from-source treatment of the rating/favorite counters
    /// is unnecessary here.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tools SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft-delete a tool. Returns `true` if the row was updated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tools SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a live tool already uses this name, optionally excluding one
    /// row (for rename checks).
    pub async fn is_name_taken(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tools
             WHERE name = $1 AND deleted_at IS NULL AND ($2::bigint IS NULL OR id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Directory-wide counters for the admin dashboard.
    pub async fn stats(pool: &PgPool) -> Result<ToolStats, sqlx::Error> {
        sqlx::query_as::<_, ToolStats>(
            "SELECT COUNT(*) AS total_tools,
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending_tools,
                    COUNT(*) FILTER (WHERE status = 'approved') AS approved_tools,
                    COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_tools,
                    COALESCE(SUM(view_count), 0)::bigint AS total_views,
                    COALESCE(SUM(favorite_count), 0)::bigint AS total_favorites
             FROM tools
             WHERE deleted_at IS NULL",
        )
        .fetch_one(pool)
        .await
    }

    /// Simple directory search: name and description substring match, name
    /// hits ranked above description hits, then recency.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tool>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {COLUMNS} FROM tools
             WHERE (name ILIKE $1 OR description ILIKE $1)
               AND status = '{STATUS_APPROVED}' AND deleted_at IS NULL
             ORDER BY CASE WHEN name ILIKE $1 THEN 1 ELSE 2 END, created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Name-prefix suggestions for the search box.
    pub async fn suggest_names(
        pool: &PgPool,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let pattern = format!("{prefix}%");
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM tools
             WHERE name ILIKE $1 AND status = 'approved' AND deleted_at IS NULL
             ORDER BY view_count DESC, name
             LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
