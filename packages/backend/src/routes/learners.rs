use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::response::{ok, AppError};
use crate::state::AppState;

const DEFAULT_SESSION_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:learner_id/sessions", get(list_sessions))
        .route("/:learner_id/progress", get(topic_progress))
        .route("/:learner_id/reviews/due", get(due_reviews))
}

#[derive(Debug, Deserialize)]
struct ListSessionsQuery {
    limit: Option<usize>,
}

async fn list_sessions(
    State(state): State<AppState>,
    Path(learner_id): Path<String>,
    query: Result<Query<ListSessionsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_SESSION_LIMIT);
    Ok(ok(state
        .sessions()
        .list_for_learner(&learner_id, limit, Utc::now())))
}

async fn topic_progress(State(state): State<AppState>, Path(learner_id): Path<String>) -> Response {
    ok(state.sessions().topic_progress(&learner_id))
}

async fn due_reviews(State(state): State<AppState>, Path(learner_id): Path<String>) -> Response {
    ok(state.sessions().due_reviews(&learner_id, Utc::now()))
}
