//! Route tree assembly.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod course_favorites;
pub mod course_history;
pub mod course_ratings;
pub mod courses;
pub mod favorite_folders;
pub mod favorites;
pub mod health;
pub mod history;
pub mod notifications;
pub mod orders;
pub mod ratings;
pub mod search;
pub mod tools;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/*               registration codes, login, refresh, password reset
/// /tools/*              directory browsing, submission, moderation
/// /categories           static catalog
/// /ratings/*            tool ratings (transactional counter recompute)
/// /favorites/*          favorites + batch operations
/// /favorite-folders/*   folder CRUD and moves
/// /comments/*           threads, votes, reports, moderation
/// /history/*            activity tracking
/// /search/*             combined search + suggestions
/// /user/*               profile, password, account
/// /notifications/*      in-app notifications
/// /courses/*            night-school courses
/// /course-ratings/*     course ratings
/// /course-favorites/*   course favorites
/// /course-history/*     course progress history
/// /orders/*             paid enrollment
/// /admin/dashboard/*    admin counters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tools", tools::router())
        .nest("/categories", categories::router())
        .nest("/ratings", ratings::router())
        .nest("/favorites", favorites::router())
        .nest("/favorite-folders", favorite_folders::router())
        .nest("/comments", comments::router())
        .nest("/history", history::router())
        .nest("/search", search::router())
        .nest("/user", users::router())
        .nest("/notifications", notifications::router())
        .nest("/courses", courses::router())
        .nest("/course-ratings", course_ratings::router())
        .nest("/course-favorites", course_favorites::router())
        .nest("/course-history", course_history::router())
        .nest("/orders", orders::router())
        .nest("/admin/dashboard", admin::router())
}
