//! Course models and DTOs for the night-school feature.
//!
//! Courses carry the same derived rating/favorite counters as tools,
//! recomputed from `course_ratings` and `course_favorites`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub max_students: i32,
    pub current_students: i32,
    pub tags: serde_json::Value,
    pub category: Option<String>,
    pub rating_count: i64,
    pub average_rating: f64,
    pub favorite_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a course (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub max_students: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Option<String>,
}

/// DTO for updating a course. `current_students` and the derived counters
/// are not client-mutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub max_students: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Query parameters for the course listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `course_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseRating {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course rating joined with the author's public fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseRatingWithAuthor {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub username: String,
    pub user_avatar: Option<String>,
}

/// DTO for submitting a course rating.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRating {
    pub course_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
}

/// DTO for editing a course rating.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourseRating {
    pub rating: i16,
    pub comment: Option<String>,
}

/// A row from the `course_favorites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseFavorite {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course favorite joined with course display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseFavoriteWithCourse {
    pub id: DbId,
    pub course_id: DbId,
    pub created_at: Timestamp,
    pub title: String,
    pub instructor: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub average_rating: f64,
    pub rating_count: i64,
}

/// A row from the `course_history` table: one per (user, course),
/// refreshed on every visit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseHistoryEntry {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub progress_percent: i32,
    pub last_viewed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording course progress.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackCourseProgress {
    pub course_id: DbId,
    /// 0-100; omitted means "visited without progress change".
    pub progress_percent: Option<i32>,
}
