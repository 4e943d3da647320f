//! Cognitive Load Estimator
//!
//! Converts raw interaction telemetry into a 0-100 load score and a zone.
//!
//! Components (each normalized to [0, 1] before weighting):
//! - Time load: logistic of `actual / expected` response time, centered at 1
//!   with steepness 2. Expected time is `30s + 10s * difficulty`.
//! - Difficulty load: `difficulty / 10`
//! - Mastery load: `1 - mastery / 100`
//! - Hint load: `hints / 3`
//! - Fatigue: 0 up to the onset, then a linear ramp to 1
//! - Recent performance: `max(0, 1 - streak * 0.2)`
//!
//! Load = weighted sum * 100, clamped to [0, 100] and rounded.

use std::sync::Arc;

use crate::config::LoadConfig;
use crate::observer::{AlgorithmObserver, NoopObserver};
use crate::sanitize::{clamp_finite, clamp_score, clamp_unit, non_negative};
use crate::types::{
    AdjustmentDirection, LoadAssessment, LoadFactors, LoadRecommendation, LoadZone,
};

// ==================== Constants ====================

/// Expected response time at difficulty 0
const BASE_RESPONSE_SECONDS: f64 = 30.0;

/// Additional expected seconds per difficulty level
const SECONDS_PER_DIFFICULTY: f64 = 10.0;

/// Logistic steepness for the time ratio
const TIME_STEEPNESS: f64 = 2.0;

/// Hint usage saturates here
const MAX_HINTS: u32 = 3;

/// Each consecutive correct answer removes this much performance load
const STREAK_RELIEF: f64 = 0.2;

const MIN_QUESTION_DIFFICULTY: f64 = 1.0;
const MAX_QUESTION_DIFFICULTY: f64 = 10.0;

/// Seconds a learner is expected to need at `difficulty`.
pub fn expected_response_time(difficulty: f64) -> f64 {
    let difficulty = clamp_finite(difficulty, MIN_QUESTION_DIFFICULTY, MAX_QUESTION_DIFFICULTY);
    BASE_RESPONSE_SECONDS + SECONDS_PER_DIFFICULTY * difficulty
}

// ==================== Estimator ====================

pub struct CognitiveLoadEstimator {
    config: LoadConfig,
    observer: Arc<dyn AlgorithmObserver>,
}

impl CognitiveLoadEstimator {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AlgorithmObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Load score in [0, 100].
    pub fn estimate_load(&self, factors: &LoadFactors) -> u8 {
        let difficulty = clamp_finite(
            factors.question_difficulty,
            MIN_QUESTION_DIFFICULTY,
            MAX_QUESTION_DIFFICULTY,
        );

        let time_load = self.time_load(factors.response_time_seconds, difficulty);
        let difficulty_load = clamp_unit(difficulty / 10.0);
        let mastery_load = clamp_unit(1.0 - clamp_score(factors.user_mastery) / 100.0);
        let hint_load = clamp_unit(factors.hint_usage.min(MAX_HINTS) as f64 / MAX_HINTS as f64);
        let fatigue_load = self.fatigue(factors.session_duration_minutes);
        let performance_load = performance_load(factors.consecutive_correct);

        let w = &self.config.weights;
        let raw = (time_load * w.time
            + difficulty_load * w.difficulty
            + mastery_load * w.mastery
            + hint_load * w.hints
            + fatigue_load * w.fatigue
            + performance_load * w.performance)
            * 100.0;

        let load = clamp_score(raw).round() as u8;
        self.observer
            .on_load_estimated(factors, load, self.zone_of(load));
        load
    }

    /// Estimate plus zone and recommendation in one call.
    pub fn assess(&self, factors: &LoadFactors) -> LoadAssessment {
        let load = self.estimate_load(factors);
        LoadAssessment {
            load,
            zone: self.zone_of(load),
            recommendation: self.recommendation(load),
        }
    }

    /// Accepts fractional loads so session averages can be classified too.
    pub fn zone_of(&self, load: impl Into<f64>) -> LoadZone {
        let load = clamp_score(load.into());
        let c = &self.config;

        if load < c.low_threshold {
            LoadZone::Low
        } else if load >= c.optimal_min && load <= c.optimal_max {
            LoadZone::Optimal
        } else if load > c.high_threshold {
            LoadZone::Overload
        } else {
            LoadZone::High
        }
    }

    pub fn recommended_adjustment_direction(&self, load: impl Into<f64>) -> AdjustmentDirection {
        match self.zone_of(load) {
            LoadZone::Low => AdjustmentDirection::Increase,
            LoadZone::Overload => AdjustmentDirection::Decrease,
            LoadZone::Optimal | LoadZone::High => AdjustmentDirection::Maintain,
        }
    }

    pub fn recommendation(&self, load: impl Into<f64>) -> LoadRecommendation {
        let direction = self.recommended_adjustment_direction(load);
        LoadRecommendation {
            adjust: direction != AdjustmentDirection::Maintain,
            direction,
        }
    }

    fn time_load(&self, response_time_seconds: f64, difficulty: f64) -> f64 {
        let ratio = non_negative(response_time_seconds) / expected_response_time(difficulty);
        clamp_unit(1.0 / (1.0 + (-TIME_STEEPNESS * (ratio - 1.0)).exp()))
    }

    fn fatigue(&self, duration_minutes: f64) -> f64 {
        let minutes = non_negative(duration_minutes);
        let onset = self.config.fatigue_onset_minutes;
        if minutes <= onset {
            return 0.0;
        }
        clamp_unit((minutes - onset) / self.config.fatigue_ramp_minutes)
    }
}

impl Default for CognitiveLoadEstimator {
    fn default() -> Self {
        Self::new(LoadConfig::default())
    }
}

fn performance_load(consecutive_correct: u32) -> f64 {
    clamp_unit(1.0 - consecutive_correct as f64 * STREAK_RELIEF)
}
