//! Handlers for the `/search` resource.
//!
//! Search is deliberately simple: ILIKE substring matching with name hits
//! ranked above description hits. Matching categories come from the
//! static catalog.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::categories::{Category, CATEGORIES};
use toolhub_core::error::CoreError;
use toolhub_db::models::comment::Comment;
use toolhub_db::models::history::TrackAction;
use toolhub_db::models::tool::Tool;
use toolhub_db::repositories::{CommentRepo, HistoryRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Combined search results.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub tools: Vec<Tool>,
    pub comments: Vec<Comment>,
    pub categories: Vec<Category>,
}

/// GET /api/v1/search
///
/// Combined search over tools, comments, and the category catalog.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let term = params.q.trim();
    if term.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Search term must not be empty".into(),
        )));
    }

    let limit = params.limit.unwrap_or(20).min(100);
    let offset = params.offset.unwrap_or(0);

    let tools = ToolRepo::search(&state.pool, term, limit, offset).await?;
    let comments = CommentRepo::search(&state.pool, term, limit, offset).await?;

    let needle = term.to_lowercase();
    let categories: Vec<Category> = CATEGORIES
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.id.contains(&needle)
        })
        .copied()
        .collect();

    Ok(Json(DataResponse {
        data: SearchResponse {
            tools,
            comments,
            categories,
        },
    }))
}

/// Request body for `POST /search/log`.
#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub term: String,
}

/// One popular search term with its frequency.
#[derive(Debug, Serialize)]
pub struct PopularTerm {
    pub term: String,
    pub count: i64,
}

/// POST /api/v1/search/log
///
/// Record a search for the stats endpoint. Anonymous searches are
/// accepted and dropped; only authenticated ones land in the history.
pub async fn log(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Json(input): Json<LogRequest>,
) -> AppResult<impl IntoResponse> {
    let term = input.term.trim();
    if term.is_empty() || term.len() > 200 {
        return Err(AppError::Core(CoreError::Validation(
            "Search term must be 1-200 characters".into(),
        )));
    }

    if let Some(user) = auth {
        HistoryRepo::track(
            &state.pool,
            user.user_id,
            &TrackAction {
                action: "search".to_string(),
                target_type: "search".to_string(),
                target_id: None,
                target_name: Some(term.to_string()),
                metadata: None,
            },
        )
        .await?;
    }

    Ok(Json(DataResponse { data: true }))
}

/// GET /api/v1/search/stats
///
/// Most frequent search terms.
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let terms = HistoryRepo::popular_search_terms(&state.pool, 20).await?;
    let terms: Vec<PopularTerm> = terms
        .into_iter()
        .map(|(term, count)| PopularTerm { term, count })
        .collect();
    Ok(Json(DataResponse { data: terms }))
}

/// GET /api/v1/search/suggestions
///
/// Tool-name prefix suggestions for the search box.
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let term = params.q.trim();
    if term.is_empty() {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }

    let names = ToolRepo::suggest_names(&state.pool, term, params.limit.unwrap_or(10).min(50)).await?;
    Ok(Json(DataResponse { data: names }))
}
