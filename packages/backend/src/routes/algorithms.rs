//! Stateless access to the three estimators.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use learnloop_algo::spaced_repetition::MAX_QUALITY;
use learnloop_algo::{expected_response_time, LoadFactors, Sm2Result};
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cognitive-load", post(cognitive_load))
        .route("/difficulty/adjust", post(adjust_difficulty))
        .route("/difficulty/initial", post(initial_difficulty))
        .route("/reviews/next", post(next_review))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustDifficultyRequest {
    current_difficulty: f64,
    understanding_score: f64,
    cognitive_load: f64,
    response_time_seconds: Option<f64>,
    expected_time_seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitialDifficultyRequest {
    user_level: f64,
    topic_mastery: f64,
    average_performance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitialDifficultyResponse {
    difficulty: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextReviewRequest {
    quality: Option<u8>,
    understanding_score: Option<f64>,
    #[serde(default)]
    repetitions: u32,
    ease_factor: Option<f64>,
    #[serde(default)]
    interval_days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NextReviewResponse {
    quality: u8,
    #[serde(flatten)]
    result: Sm2Result,
    next_review_date: NaiveDate,
}

async fn cognitive_load(
    State(state): State<AppState>,
    payload: Result<Json<LoadFactors>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(factors) = payload?;
    Ok(ok(state.suite().load.assess(&factors)))
}

/// Missing timings default to the expected time for the current difficulty,
/// which makes the time component neutral.
async fn adjust_difficulty(
    State(state): State<AppState>,
    payload: Result<Json<AdjustDifficultyRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let expected = req
        .expected_time_seconds
        .unwrap_or_else(|| expected_response_time(req.current_difficulty));
    let actual = req.response_time_seconds.unwrap_or(expected);

    let adjustment = state.suite().difficulty.adjust_difficulty(
        req.current_difficulty,
        req.understanding_score,
        req.cognitive_load,
        actual,
        expected,
    );
    Ok(ok(adjustment))
}

async fn initial_difficulty(
    State(state): State<AppState>,
    payload: Result<Json<InitialDifficultyRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let difficulty = state.suite().difficulty.suggest_initial_difficulty(
        req.user_level,
        req.topic_mastery,
        req.average_performance,
    );
    Ok(ok(InitialDifficultyResponse { difficulty }))
}

async fn next_review(
    State(state): State<AppState>,
    payload: Result<Json<NextReviewRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let scheduler = &state.suite().scheduler;

    let quality = match (req.quality, req.understanding_score) {
        (Some(quality), _) if quality > MAX_QUALITY => {
            return Err(AppError::validation(format!(
                "quality must be between 0 and {MAX_QUALITY}"
            )))
        }
        (Some(quality), _) => quality,
        (None, Some(score)) => scheduler.understanding_to_quality(score),
        (None, None) => {
            return Err(AppError::validation(
                "either quality or understandingScore is required",
            ))
        }
    };

    let ease_factor = req
        .ease_factor
        .unwrap_or(scheduler.config().default_ease_factor);
    let result =
        scheduler.calculate_next_review(quality, req.repetitions, ease_factor, req.interval_days);

    Ok(ok(NextReviewResponse {
        quality,
        next_review_date: scheduler.next_review_date(result.interval_days),
        result,
    }))
}
