pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use learnloop_algo::AlgorithmSuite;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Config, ConfigError};
use crate::state::AppState;

/// Builds the full router for `config`, failing on invalid algorithm settings.
pub fn create_app(config: &Config) -> Result<axum::Router, ConfigError> {
    let suite = AlgorithmSuite::new(config.algorithm_config()?)?;
    Ok(build_app(AppState::new(suite, config.max_questions_per_session)))
}

pub fn build_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
