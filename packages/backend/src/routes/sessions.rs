use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::response::{created, ok, AppError};
use crate::services::session::{StartSessionInput, SubmitResponseInput};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/:id", get(get_session))
        .route("/:id/responses", post(submit_response))
        .route("/:id/pause", post(pause_session))
        .route("/:id/resume", post(resume_session))
        .route("/:id/complete", post(complete_session))
}

async fn start_session(
    State(state): State<AppState>,
    payload: Result<Json<StartSessionInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    let snapshot = state.sessions().start(input, Utc::now())?;
    Ok(created(snapshot))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    Ok(ok(state.sessions().get(id, Utc::now())?))
}

async fn submit_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubmitResponseInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let Json(input) = payload?;
    let outcome = state.sessions().submit_response(id, input, Utc::now())?;
    Ok(ok(outcome))
}

async fn pause_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    Ok(ok(state.sessions().pause(id, Utc::now())?))
}

async fn resume_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    Ok(ok(state.sessions().resume(id, Utc::now())?))
}

async fn complete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    Ok(ok(state.sessions().complete(id, Utc::now())?))
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("invalid session id: {raw}")))
}
