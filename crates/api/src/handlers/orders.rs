//! Handlers for the `/orders` resource: paid course enrollment.
//!
//! Paying an order takes a seat on the course; cancelling a paid order
//! releases it. Both transitions drop a notification for the buyer.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::notification::CreateNotification;
use toolhub_db::models::order::{
    CreateOrder, Order, UpdateOrderStatus, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_PAID,
    STATUS_PENDING,
};
use toolhub_db::repositories::{CourseRepo, NotificationRepo, OrderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/orders
///
/// The caller's orders, newest first, optionally filtered by status.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        validate_status(status)?;
    }

    let orders = OrderRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.status.as_deref(),
        params.limit,
        params.offset,
    )
    .await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = find_own_order(&state, order_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders
///
/// Place an order for a course. Refused when the course is full or the
/// caller already holds a live enrollment. The amount is the course
/// price at order time, taken server-side.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    let course = CourseRepo::find_by_id(&state.pool, input.course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }))?;

    if course.current_students >= course.max_students {
        return Err(AppError::Core(CoreError::Conflict("Course is full".into())));
    }

    if OrderRepo::has_active_enrollment(&state.pool, auth.user_id, course.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You are already enrolled in this course".into(),
        )));
    }

    let order = OrderRepo::create(
        &state.pool,
        course.id,
        auth.user_id,
        course.price,
        input.payment_method.as_deref(),
        input.notes.as_deref(),
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        course_id = course.id,
        user_id = auth.user_id,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// PATCH /api/v1/orders/{id}/status
///
/// Transition an order. Paying takes a course seat; cancelling a paid
/// order releases it.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let order = find_own_order(&state, order_id, auth.user_id).await?;
    let order = apply_transition(&state, order, &input).await?;

    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders/{id}/cancel
///
/// Shorthand for a transition to `cancelled`.
pub async fn cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = find_own_order(&state, order_id, auth.user_id).await?;
    let order = apply_transition(
        &state,
        order,
        &UpdateOrderStatus {
            status: STATUS_CANCELLED.to_string(),
            payment_method: None,
            payment_transaction_id: None,
            notes: None,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: order }))
}

/// Apply a status transition with its course-seat side effects and
/// notification.
async fn apply_transition(
    state: &AppState,
    order: Order,
    input: &UpdateOrderStatus,
) -> AppResult<Order> {
    if order.status == input.status {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Order is already {}",
            order.status
        ))));
    }
    // Terminal states stay terminal.
    if order.status == STATUS_CANCELLED || order.status == STATUS_COMPLETED {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A {} order cannot change status",
            order.status
        ))));
    }

    let was_paid = order.status == STATUS_PAID;

    let updated = OrderRepo::update_status(&state.pool, order.id, input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order.id,
        }))?;

    // Seat accounting: pay takes a seat, cancel-after-pay releases one.
    if updated.status == STATUS_PAID && !was_paid {
        let seated = CourseRepo::increment_students(&state.pool, updated.course_id).await?;
        if !seated {
            tracing::warn!(
                order_id = updated.id,
                course_id = updated.course_id,
                "Paid order on a full course; seat count unchanged"
            );
        }
    }
    if updated.status == STATUS_CANCELLED && was_paid {
        CourseRepo::decrement_students(&state.pool, updated.course_id).await?;
    }

    let (title, content) = match updated.status.as_str() {
        STATUS_PAID => (
            "Payment received".to_string(),
            "Your enrollment is confirmed.".to_string(),
        ),
        STATUS_CANCELLED => (
            "Order cancelled".to_string(),
            "Your order was cancelled.".to_string(),
        ),
        STATUS_COMPLETED => (
            "Course completed".to_string(),
            "Congratulations on finishing the course!".to_string(),
        ),
        _ => (
            "Order updated".to_string(),
            format!("Your order is now {}.", updated.status),
        ),
    };
    NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            user_id: updated.user_id,
            kind: "order_status".to_string(),
            title,
            content,
            related_id: Some(updated.id),
            related_type: Some("order".to_string()),
        },
    )
    .await?;

    tracing::info!(order_id = updated.id, status = %updated.status, "Order transitioned");

    Ok(updated)
}

/// Fetch an order and enforce ownership.
async fn find_own_order(state: &AppState, order_id: DbId, user_id: DbId) -> AppResult<Order> {
    let order = OrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;

    if order.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This order belongs to another user".into(),
        )));
    }

    Ok(order)
}

fn validate_status(status: &str) -> Result<(), AppError> {
    const VALID: &[&str] = &[STATUS_PENDING, STATUS_PAID, STATUS_CANCELLED, STATUS_COMPLETED];
    if !VALID.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(
            "Status must be pending, paid, cancelled, or completed".into(),
        )));
    }
    Ok(())
}
