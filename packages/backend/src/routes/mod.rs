mod algorithms;
mod health;
mod learners;
mod sessions;

use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/algorithms", algorithms::router())
        .nest("/api/sessions", sessions::router())
        .nest("/api/learners", learners::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("route not found").into_response()
}
