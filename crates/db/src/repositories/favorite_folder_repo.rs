//! Repository for the `favorite_folders` table.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::favorite::{CreateFolder, FavoriteFolder, FolderWithCount, UpdateFolder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, color, deleted_at, created_at, updated_at";

/// Provides CRUD operations for favorite folders.
pub struct FavoriteFolderRepo;

impl FavoriteFolderRepo {
    /// Insert a new folder, returning the created row.
    ///
    /// Duplicate live names per user are rejected by
    /// `uq_favorite_folders_user_name`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFolder,
        user_id: DbId,
    ) -> Result<FavoriteFolder, sqlx::Error> {
        let query = format!(
            "INSERT INTO favorite_folders (user_id, name, description, color)
             VALUES ($1, $2, $3, COALESCE($4, '#6366f1'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FavoriteFolder>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a live folder by ID, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<FavoriteFolder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM favorite_folders
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, FavoriteFolder>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's live folders, each with its live-favorite count.
    pub async fn list_with_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FolderWithCount>, sqlx::Error> {
        sqlx::query_as::<_, FolderWithCount>(
            "SELECT ff.id, ff.name, ff.description, ff.color, ff.created_at,
                    COUNT(f.id) FILTER (WHERE f.deleted_at IS NULL) AS favorites_count
             FROM favorite_folders ff
             LEFT JOIN favorites f ON f.folder_id = ff.id
             WHERE ff.user_id = $1 AND ff.deleted_at IS NULL
             GROUP BY ff.id
             ORDER BY ff.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Update a folder. Only non-`None` fields in `input` are applied.
    /// Scoped to the owning user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateFolder,
    ) -> Result<Option<FavoriteFolder>, sqlx::Error> {
        let query = format!(
            "UPDATE favorite_folders SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                color = COALESCE($5, color)
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FavoriteFolder>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a folder and detach its favorites, atomically.
    ///
    /// The favorites themselves survive -- only their `folder_id` is
    /// nulled. Returns `true` if the folder row was deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE favorite_folders SET deleted_at = NOW()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE favorites SET folder_id = NULL WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Whether the user already has a live folder with this name,
    /// optionally excluding one row (for rename checks).
    pub async fn is_name_taken(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM favorite_folders
             WHERE user_id = $1 AND name = $2 AND deleted_at IS NULL
               AND ($3::bigint IS NULL OR id <> $3)",
        )
        .bind(user_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
