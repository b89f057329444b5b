//! Repository for the `course_history` table.
//!
//! One row per (user, course): visiting a course upserts the row,
//! refreshing `last_viewed_at` and optionally advancing the progress.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::course::CourseHistoryEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, course_id, user_id, progress_percent, last_viewed_at, created_at, updated_at";

/// Default page size for course history listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for course history listings.
const MAX_LIMIT: i64 = 100;

/// Provides tracking of per-course viewing history and progress.
pub struct CourseHistoryRepo;

impl CourseHistoryRepo {
    /// Record a visit, creating or refreshing the (user, course) row.
    ///
    /// Progress only moves forward: passing a lower percentage than what
    /// is stored keeps the stored value.
    pub async fn track(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        progress_percent: Option<i32>,
    ) -> Result<CourseHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_history (course_id, user_id, progress_percent)
             VALUES ($1, $2, COALESCE($3, 0))
             ON CONFLICT (user_id, course_id) DO UPDATE SET
                 progress_percent = GREATEST(course_history.progress_percent, COALESCE($3, 0)),
                 last_viewed_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseHistoryEntry>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(progress_percent)
            .fetch_one(pool)
            .await
    }

    /// Find a user's history entry for one course.
    pub async fn find_by_user_and_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CourseHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_history
             WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, CourseHistoryEntry>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's course history, most recently viewed first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CourseHistoryEntry>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM course_history
             WHERE user_id = $1
             ORDER BY last_viewed_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CourseHistoryEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Visited-course count and mean progress for the stats endpoint.
    pub async fn stats_for_user(pool: &PgPool, user_id: DbId) -> Result<(i64, f64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*),
                    COALESCE(ROUND(AVG(progress_percent)::numeric, 2)::float8, 0)
             FROM course_history
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
