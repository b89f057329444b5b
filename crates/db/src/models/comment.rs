//! Comment models and DTOs.
//!
//! Comments form a shallow thread: replies reference a parent comment and
//! the API exposes one level of nesting. A comment may carry its own star
//! rating, which is a separate channel from the `ratings` table and only
//! surfaces through the read-path comment summary.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

pub const VOTE_LIKE: &str = "like";
pub const VOTE_DISLIKE: &str = "dislike";

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub tool_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub rating: Option<i16>,
    pub is_anonymous: bool,
    pub like_count: i64,
    pub dislike_count: i64,
    pub report_count: i64,
    pub is_approved: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's public fields.
///
/// `username`/`user_avatar` come from the join; callers must blank them
/// for anonymous comments before serializing to clients.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub tool_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub rating: Option<i16>,
    pub is_anonymous: bool,
    pub like_count: i64,
    pub dislike_count: i64,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub username: Option<String>,
    pub user_avatar: Option<String>,
}

impl CommentWithAuthor {
    /// Hide the author's identity on anonymous comments.
    pub fn redact_if_anonymous(mut self) -> Self {
        if self.is_anonymous {
            self.username = None;
            self.user_avatar = None;
        }
        self
    }
}

/// A top-level comment bundled with its direct replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentWithAuthor,
    pub replies: Vec<CommentWithAuthor>,
}

/// DTO for posting a comment or a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub tool_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub rating: Option<i16>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// DTO for editing a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
    pub rating: Option<i16>,
    pub is_anonymous: Option<bool>,
}

/// Moderation counters for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentStats {
    pub total_comments: i64,
    pub pending_comments: i64,
    pub approved_comments: i64,
    pub total_likes: i64,
    pub total_reports: i64,
}
