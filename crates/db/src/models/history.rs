//! User activity history models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// A row from the `user_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<DbId>,
    pub target_name: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for tracking an action.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackAction {
    pub action: String,
    pub target_type: String,
    pub target_id: Option<DbId>,
    pub target_name: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Query parameters for listing history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryListParams {
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-action count for the history stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: i64,
}
