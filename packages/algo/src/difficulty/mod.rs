//! Adaptive Difficulty Engine
//!
//! Elo-style comparison of expected versus actual performance at the current
//! difficulty.
//!
//! - Expected performance: `1 - 0.5 * normalized_difficulty`, so 1.0 at the
//!   easiest level and 0.5 at the hardest.
//! - Actual performance: `0.5 * understanding + 0.3 * (1 - load)
//!   + 0.2 * min(1, expected_time / response_time)`, clamped to [0, 1].
//! - Delta: `(K / 10) * (actual - expected)`. K is rescaled because difficulty
//!   spans 1-10 rather than a probability.

use std::sync::Arc;

use crate::config::DifficultyConfig;
use crate::observer::{AlgorithmObserver, NoopObserver};
use crate::sanitize::{capped_ratio, clamp_finite, clamp_score, clamp_unit, round_to_tenth};
use crate::types::{DifficultyAdjustment, DifficultyReason, DifficultyState};

// ==================== Constants ====================

const UNDERSTANDING_WEIGHT: f64 = 0.5;
const LOAD_WEIGHT: f64 = 0.3;
const TIME_EFFICIENCY_WEIGHT: f64 = 0.2;

/// Expected performance drop from easiest to hardest level
const EXPECTED_PERFORMANCE_SPAN: f64 = 0.5;

/// Changes smaller than this count as "no change"
const NEUTRAL_BAND: f64 = 0.1;

const EXCELLENT_UNDERSTANDING: f64 = 85.0;
const GOOD_UNDERSTANDING: f64 = 75.0;
const LOW_UNDERSTANDING: f64 = 60.0;
const RELAXED_LOAD: f64 = 60.0;
const OVERLOAD: f64 = 85.0;

const HIGH_AVERAGE_PERFORMANCE: f64 = 80.0;
const LOW_AVERAGE_PERFORMANCE: f64 = 60.0;
const MASTERY_BONUS: f64 = 2.0;

// ==================== Engine ====================

pub struct DifficultyEngine {
    config: DifficultyConfig,
    observer: Arc<dyn AlgorithmObserver>,
}

impl DifficultyEngine {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AlgorithmObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Next difficulty after one answered question.
    pub fn adjust_difficulty(
        &self,
        current_difficulty: f64,
        understanding_score: f64,
        cognitive_load: f64,
        response_time_seconds: f64,
        expected_time_seconds: f64,
    ) -> DifficultyAdjustment {
        let current = self.clamp(current_difficulty);
        let understanding = clamp_score(understanding_score);
        let load = clamp_score(cognitive_load);

        let expected = self.expected_performance(current);
        let actual = self.actual_performance(
            understanding,
            load,
            response_time_seconds,
            expected_time_seconds,
        );

        let delta = self.config.max_step() * (actual - expected);
        let new_difficulty = self.clamp(round_to_tenth(self.clamp(current + delta)));

        let adjustment = DifficultyAdjustment {
            new_difficulty,
            change: new_difficulty - current,
            reason: classify_reason(delta, understanding, load),
        };

        self.observer
            .on_difficulty_adjusted(current, understanding, load, &adjustment);
        adjustment
    }

    /// [`adjust_difficulty`](Self::adjust_difficulty) over a carried state.
    pub fn adjust(
        &self,
        state: &DifficultyState,
        understanding_score: f64,
        cognitive_load: f64,
        response_time_seconds: f64,
        expected_time_seconds: f64,
    ) -> (DifficultyState, DifficultyAdjustment) {
        let adjustment = self.adjust_difficulty(
            state.current_difficulty,
            understanding_score,
            cognitive_load,
            response_time_seconds,
            expected_time_seconds,
        );
        (DifficultyState::new(adjustment.new_difficulty), adjustment)
    }

    /// Performance a learner is expected to reach at `difficulty`, in [0.5, 1].
    pub fn expected_performance(&self, difficulty: f64) -> f64 {
        let span = self.config.max - self.config.min;
        let normalized = (self.clamp(difficulty) - self.config.min) / span;
        1.0 - normalized * EXPECTED_PERFORMANCE_SPAN
    }

    /// Observed performance in [0, 1].
    pub fn actual_performance(
        &self,
        understanding_score: f64,
        cognitive_load: f64,
        response_time_seconds: f64,
        expected_time_seconds: f64,
    ) -> f64 {
        let understanding = clamp_score(understanding_score) / 100.0;
        let relief = 1.0 - clamp_score(cognitive_load) / 100.0;
        let time_efficiency = capped_ratio(expected_time_seconds, response_time_seconds);

        clamp_unit(
            understanding * UNDERSTANDING_WEIGHT
                + relief * LOAD_WEIGHT
                + time_efficiency * TIME_EFFICIENCY_WEIGHT,
        )
    }

    /// Starting level for a new topic. Integer-grained on purpose.
    pub fn suggest_initial_difficulty(
        &self,
        user_level: f64,
        topic_mastery: f64,
        average_performance: f64,
    ) -> u8 {
        let mastery = clamp_score(topic_mastery);
        let performance = clamp_score(average_performance);

        let mut difficulty = self.clamp(user_level / 2.0);

        if mastery > 0.0 {
            difficulty += mastery / 100.0 * MASTERY_BONUS;
        }

        if performance > HIGH_AVERAGE_PERFORMANCE {
            difficulty += 1.0;
        } else if performance < LOW_AVERAGE_PERFORMANCE {
            difficulty -= 1.0;
        }

        let suggested = self.clamp(difficulty).round().clamp(0.0, u8::MAX as f64) as u8;
        self.observer
            .on_initial_difficulty(user_level, mastery, performance, suggested);
        suggested
    }

    fn clamp(&self, difficulty: f64) -> f64 {
        clamp_finite(difficulty, self.config.min, self.config.max)
    }
}

impl Default for DifficultyEngine {
    fn default() -> Self {
        Self::new(DifficultyConfig::default())
    }
}

/// Reason for a raw (pre-clamp) difficulty delta. Order matters.
fn classify_reason(delta: f64, understanding: f64, load: f64) -> DifficultyReason {
    if delta.abs() < NEUTRAL_BAND {
        return DifficultyReason::MatchesCurrentLevel;
    }

    if delta > 0.0 {
        if understanding >= EXCELLENT_UNDERSTANDING && load < RELAXED_LOAD {
            DifficultyReason::ExcellentPerformance
        } else if understanding >= GOOD_UNDERSTANDING {
            DifficultyReason::GoodUnderstanding
        } else {
            DifficultyReason::SlightIncrease
        }
    } else if load > OVERLOAD {
        DifficultyReason::HighCognitiveLoad
    } else if understanding < LOW_UNDERSTANDING {
        DifficultyReason::LowUnderstanding
    } else {
        DifficultyReason::SlightDecrease
    }
}
