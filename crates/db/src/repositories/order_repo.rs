//! Repository for the `orders` table.
//!
//! Status transitions stamp the matching timestamp column. The
//! student-count side effects on the course live in the handler, which
//! coordinates [`crate::repositories::CourseRepo`] and notifications.

use sqlx::PgPool;
use toolhub_core::types::DbId;

use crate::models::order::{Order, UpdateOrderStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, user_id, amount, status, paid_at, cancelled_at, \
                        completed_at, payment_method, payment_transaction_id, notes, \
                        deleted_at, created_at, updated_at";

/// Default page size for order listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for order listings.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new pending order, returning the created row.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        amount: f64,
        payment_method: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (course_id, user_id, amount, payment_method, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(amount)
            .bind(payment_method)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// Find a live order by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's live orders, newest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1 AND deleted_at IS NULL
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Whether the user already holds a pending/paid/completed order for
    /// this course. Used to block double enrollment.
    pub async fn has_active_enrollment(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders
             WHERE user_id = $1 AND course_id = $2 AND deleted_at IS NULL
               AND status IN ('pending', 'paid', 'completed')",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Apply a status transition, stamping the matching timestamp and
    /// patching payment details. Returns the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                status = $2,
                paid_at = CASE WHEN $2 = 'paid' THEN NOW() ELSE paid_at END,
                cancelled_at = CASE WHEN $2 = 'cancelled' THEN NOW() ELSE cancelled_at END,
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END,
                payment_method = COALESCE($3, payment_method),
                payment_transaction_id = COALESCE($4, payment_transaction_id),
                notes = COALESCE($5, notes)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.payment_method)
            .bind(&input.payment_transaction_id)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }
}
