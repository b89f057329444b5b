//! Favorite and favorite-folder models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// A row from the `favorites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Favorite {
    pub id: DbId,
    pub tool_id: DbId,
    pub user_id: DbId,
    pub folder_id: Option<DbId>,
    pub notes: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A favorite joined with its tool's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteWithTool {
    pub id: DbId,
    pub tool_id: DbId,
    pub folder_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub name: String,
    pub description: String,
    pub category: String,
    pub website: Option<String>,
    pub pricing: Option<String>,
    pub average_rating: f64,
    pub rating_count: i64,
    pub view_count: i64,
    pub favorite_count: i64,
}

/// DTO for adding a favorite.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFavorite {
    pub tool_id: DbId,
    pub folder_id: Option<DbId>,
    pub notes: Option<String>,
}

/// Query parameters for listing a user's favorites.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteListParams {
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-user favorite statistics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteStats {
    pub total_favorites: i64,
    pub categories_count: i64,
    pub avg_rating: f64,
}

/// A row from the `favorite_folders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteFolder {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A folder with the number of live favorites filed under it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FolderWithCount {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: Timestamp,
    pub favorites_count: i64,
}

/// DTO for creating a folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolder {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// DTO for updating a folder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFolder {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}
