//! Tool entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// Moderation status of a submitted tool.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// A row from the `tools` table.
///
/// `rating_count`, `average_rating`, and `favorite_count` are derived from
/// the ratings/favorites tables; they are read here but only ever written
/// by the recompute statements in [`crate::aggregates`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tool {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: serde_json::Value,
    pub website: Option<String>,
    pub pricing: Option<String>,
    pub features: serde_json::Value,
    pub submitted_by: Option<DbId>,
    pub status: String,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejected_reason: Option<String>,
    pub view_count: i64,
    pub rating_count: i64,
    pub average_rating: f64,
    pub favorite_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a new tool. Submissions always start as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTool {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub website: Option<String>,
    pub pricing: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// DTO for updating a tool's editable fields. The derived counters, the
/// moderation columns, and `view_count` are deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTool {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub website: Option<String>,
    pub pricing: Option<String>,
    pub features: Option<Vec<String>>,
}

/// Query parameters for the approved-tools listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolListParams {
    pub category: Option<String>,
    /// One of `created_at`, `name`, `average_rating`, `view_count`,
    /// `favorite_count`. Anything else falls back to `created_at`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Directory-wide tool counters for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ToolStats {
    pub total_tools: i64,
    pub pending_tools: i64,
    pub approved_tools: i64,
    pub rejected_tools: i64,
    pub total_views: i64,
    pub total_favorites: i64,
}
