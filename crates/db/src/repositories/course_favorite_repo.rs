//! Repository for the `course_favorites` table.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::aggregates::CourseAggregates;
use crate::models::course::{CourseFavorite, CourseFavoriteWithCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, user_id, deleted_at, created_at, updated_at";

/// Default page size for course favorite listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for course favorite listings.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for course favorites.
pub struct CourseFavoriteRepo;

impl CourseFavoriteRepo {
    /// Insert a course favorite and recompute the course's counter,
    /// atomically. Duplicates are rejected by
    /// `uq_course_favorites_user_course`.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
    ) -> Result<CourseFavorite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO course_favorites (course_id, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseFavorite>(&query)
            .bind(course_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        CourseAggregates::recompute_favorites(&mut *tx, course_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Soft-delete by (user, course) and recompute, atomically. Returns
    /// `true` if a live favorite was removed.
    pub async fn soft_delete_by_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE course_favorites SET deleted_at = NOW()
             WHERE user_id = $1 AND course_id = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        CourseAggregates::recompute_favorites(&mut *tx, course_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Find the caller's live favorite for a course, if any.
    pub async fn find_by_user_and_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CourseFavorite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_favorites
             WHERE user_id = $1 AND course_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, CourseFavorite>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's live course favorites joined with course display
    /// fields, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CourseFavoriteWithCourse>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        sqlx::query_as::<_, CourseFavoriteWithCourse>(
            "SELECT f.id, f.course_id, f.created_at,
                    c.title, c.instructor, c.price, c.image_url,
                    c.average_rating, c.rating_count
             FROM course_favorites f
             JOIN courses c ON c.id = f.course_id
             WHERE f.user_id = $1 AND f.deleted_at IS NULL AND c.deleted_at IS NULL
             ORDER BY f.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
