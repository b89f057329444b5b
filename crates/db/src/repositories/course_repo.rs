//! Repository for the `courses` table.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::course::{Course, CourseListParams, CreateCourse, UpdateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, instructor, price, image_url, duration, \
                        start_date, end_date, max_students, current_students, tags, category, \
                        rating_count, average_rating, favorite_count, \
                        deleted_at, created_at, updated_at";

/// Default page size for course listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for course listings.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, description, instructor, price, image_url, duration,
                                  start_date, end_date, max_students, tags, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.instructor)
            .bind(input.price)
            .bind(&input.image_url)
            .bind(&input.duration)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_students)
            .bind(serde_json::json!(input.tags))
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// Find a live course by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live courses, newest first, with optional category filter.
    pub async fn list(pool: &PgPool, params: &CourseListParams) -> Result<Vec<Course>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM courses
             WHERE deleted_at IS NULL
               AND ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&params.category)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                instructor = COALESCE($4, instructor),
                price = COALESCE($5, price),
                image_url = COALESCE($6, image_url),
                duration = COALESCE($7, duration),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                max_students = COALESCE($10, max_students),
                tags = COALESCE($11, tags),
                category = COALESCE($12, category)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.instructor)
            .bind(input.price)
            .bind(&input.image_url)
            .bind(&input.duration)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_students)
            .bind(input.tags.as_ref().map(|t| serde_json::json!(t)))
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a course. Returns `true` if the row was updated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one more enrolled student, refusing to pass `max_students`.
    /// Returns `false` when the course is already full (or gone).
    pub async fn increment_students(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET current_students = current_students + 1
             WHERE id = $1 AND deleted_at IS NULL AND current_students < max_students",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one fewer enrolled student, clamped at zero.
    pub async fn decrement_students(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET current_students = current_students - 1
             WHERE id = $1 AND deleted_at IS NULL AND current_students > 0",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
