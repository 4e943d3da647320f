//! Instrumentation hook.
//!
//! Components report each computation to an [`AlgorithmObserver`]. The default
//! is [`NoopObserver`]; services attach [`TracingObserver`] to get structured
//! log events.

use crate::types::{DifficultyAdjustment, LoadFactors, LoadZone, Sm2Result};

/// Every method has an empty default so implementors pick what they need.
pub trait AlgorithmObserver: Send + Sync {
    fn on_load_estimated(&self, _factors: &LoadFactors, _load: u8, _zone: LoadZone) {}

    fn on_initial_difficulty(
        &self,
        _user_level: f64,
        _topic_mastery: f64,
        _average_performance: f64,
        _suggested: u8,
    ) {
    }

    fn on_difficulty_adjusted(
        &self,
        _current_difficulty: f64,
        _understanding_score: f64,
        _cognitive_load: f64,
        _adjustment: &DifficultyAdjustment,
    ) {
    }

    fn on_review_scheduled(
        &self,
        _quality: u8,
        _previous_repetitions: u32,
        _previous_ease_factor: f64,
        _result: &Sm2Result,
    ) {
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AlgorithmObserver for NoopObserver {}

/// Emits `tracing` events under the `learnloop_algo` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AlgorithmObserver for TracingObserver {
    fn on_load_estimated(&self, factors: &LoadFactors, load: u8, zone: LoadZone) {
        tracing::debug!(
            response_time = factors.response_time_seconds,
            difficulty = factors.question_difficulty,
            mastery = factors.user_mastery,
            hints = factors.hint_usage,
            streak = factors.consecutive_correct,
            session_minutes = factors.session_duration_minutes,
            load,
            zone = zone.as_str(),
            "cognitive load estimated"
        );
    }

    fn on_initial_difficulty(
        &self,
        user_level: f64,
        topic_mastery: f64,
        average_performance: f64,
        suggested: u8,
    ) {
        tracing::info!(
            user_level,
            topic_mastery,
            average_performance,
            suggested,
            "initial difficulty suggested"
        );
    }

    fn on_difficulty_adjusted(
        &self,
        current_difficulty: f64,
        understanding_score: f64,
        cognitive_load: f64,
        adjustment: &DifficultyAdjustment,
    ) {
        tracing::info!(
            current_difficulty,
            understanding_score,
            cognitive_load,
            new_difficulty = adjustment.new_difficulty,
            change = adjustment.change,
            reason = adjustment.reason.code(),
            "difficulty adjusted"
        );
    }

    fn on_review_scheduled(
        &self,
        quality: u8,
        previous_repetitions: u32,
        previous_ease_factor: f64,
        result: &Sm2Result,
    ) {
        tracing::debug!(
            quality,
            previous_repetitions,
            previous_ease_factor,
            repetitions = result.repetitions,
            ease_factor = result.ease_factor,
            interval_days = result.interval_days,
            "next review calculated"
        );
    }
}
