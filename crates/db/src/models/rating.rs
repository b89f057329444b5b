//! Rating entity model and DTOs.
//!
//! A rating is one user's 1-5 star score for one tool, with an optional
//! short review text. At most one live rating exists per (user, tool);
//! soft-deleting one allows the user to rate again later.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub tool_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating joined with the author's public fields, for tool pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingWithAuthor {
    pub id: DbId,
    pub tool_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub username: String,
    pub user_avatar: Option<String>,
}

/// A rating joined with its tool's name, for a user's rating history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingWithTool {
    pub id: DbId,
    pub tool_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub tool_name: String,
    pub tool_description: String,
}

/// DTO for submitting a rating.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRating {
    pub tool_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
}

/// DTO for editing an existing rating in place.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRating {
    pub rating: i16,
    pub comment: Option<String>,
}

/// Star-count histogram: `distribution[0]` is the number of 1-star
/// ratings, `distribution[4]` the number of 5-star ratings.
#[derive(Debug, Clone, Serialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub distribution: [i64; 5],
}
