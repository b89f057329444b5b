//! Order models and DTOs for paid course enrollment.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolhub_core::types::{DbId, Timestamp};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PAID: &str = "paid";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_COMPLETED: &str = "completed";

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub amount: f64,
    pub status: String,
    pub paid_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub notes: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for placing an order. The amount is copied from the course price
/// server-side, never taken from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub course_id: DbId,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// DTO for an order status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub notes: Option<String>,
}
