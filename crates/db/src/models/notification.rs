//! Notification models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a notification (always server-originated).
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
}

/// Query parameters for listing notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
