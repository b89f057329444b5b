//! Repository for the `course_ratings` table.
//!
//! The course analogue of [`crate::repositories::RatingRepo`]: every
//! mutation recomputes the course's rating counters in the same
//! transaction.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::aggregates::CourseAggregates;
use crate::models::course::{
    CourseRating, CourseRatingWithAuthor, CreateCourseRating, UpdateCourseRating,
};
use crate::models::rating::RatingSummary;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, course_id, user_id, rating, comment, deleted_at, created_at, updated_at";

/// Default page size for course rating listings.
const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for course rating listings.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for course ratings.
pub struct CourseRatingRepo;

impl CourseRatingRepo {
    /// Insert a new course rating and recompute, atomically.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourseRating,
        user_id: DbId,
    ) -> Result<CourseRating, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO course_ratings (course_id, user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseRating>(&query)
            .bind(input.course_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        CourseAggregates::recompute_rating(&mut *tx, input.course_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Edit a course rating in place and recompute, atomically. Scoped to
    /// the owning user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateCourseRating,
    ) -> Result<Option<CourseRating>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE course_ratings SET rating = $3, comment = $4
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseRating>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        CourseAggregates::recompute_rating(&mut *tx, row.course_id).await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Soft-delete a course rating and recompute, atomically. Scoped to
    /// the owning user; returns the affected `course_id`.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE course_ratings SET deleted_at = NOW()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING course_id",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((course_id,)) = row else {
            return Ok(None);
        };

        CourseAggregates::recompute_rating(&mut *tx, course_id).await?;

        tx.commit().await?;
        Ok(Some(course_id))
    }

    /// Find the caller's live rating for a course, if any.
    pub async fn find_by_user_and_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CourseRating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_ratings
             WHERE user_id = $1 AND course_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, CourseRating>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Average, total, and star histogram over a course's live ratings.
    pub async fn summary(pool: &PgPool, course_id: DbId) -> Result<RatingSummary, sqlx::Error> {
        let row: (f64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 2)::float8, 0),
                    COUNT(*),
                    COUNT(*) FILTER (WHERE rating = 1),
                    COUNT(*) FILTER (WHERE rating = 2),
                    COUNT(*) FILTER (WHERE rating = 3),
                    COUNT(*) FILTER (WHERE rating = 4),
                    COUNT(*) FILTER (WHERE rating = 5)
             FROM course_ratings
             WHERE course_id = $1 AND deleted_at IS NULL",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await?;

        Ok(RatingSummary {
            average_rating: row.0,
            total_ratings: row.1,
            distribution: [row.2, row.3, row.4, row.5, row.6],
        })
    }

    /// Most recent live ratings for a course, with author info.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CourseRatingWithAuthor>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        sqlx::query_as::<_, CourseRatingWithAuthor>(
            "SELECT r.id, r.course_id, r.user_id, r.rating, r.comment, r.created_at,
                    u.username, u.avatar AS user_avatar
             FROM course_ratings r
             JOIN users u ON u.id = r.user_id
             WHERE r.course_id = $1 AND r.deleted_at IS NULL
             ORDER BY r.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(course_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// A user's live course ratings, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CourseRating>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM course_ratings
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CourseRating>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
