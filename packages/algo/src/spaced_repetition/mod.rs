//! Spaced Repetition Scheduler (SM-2)
//!
//! Per learner-concept state machine:
//! - new (reps = 0) -> learning (reps 1-2) -> reviewing (reps >= 3)
//! - a review with quality < 3 sends the concept back to new with a one day
//!   interval, but keeps the ease factor
//! - only successful reviews move the ease factor, so it acts as a slow
//!   "difficulty memory" while reps and interval are the fast schedule state
//!
//! Intervals: 1 day, 6 days, then `round(previous * ease)`.
//! Ease update: `ease + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};

use crate::config::Sm2Config;
use crate::observer::{AlgorithmObserver, NoopObserver};
use crate::sanitize::{clamp_score, finite_or};
use crate::types::{ReviewState, Sm2Result};

// ==================== Constants ====================

pub const MAX_QUALITY: u8 = 5;

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;

/// Interval after a failed recall
const RELEARN_INTERVAL_DAYS: u32 = 1;

/// Upper bound on any interval (100 years)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Lower edges of the understanding bands for quality 5, 4, 3, 2, 1
const QUALITY_BANDS: [(f64, u8); 5] = [(90.0, 5), (80.0, 4), (70.0, 3), (60.0, 2), (50.0, 1)];

// ==================== Scheduler ====================

pub struct SpacedRepetitionScheduler {
    config: Sm2Config,
    observer: Arc<dyn AlgorithmObserver>,
}

impl SpacedRepetitionScheduler {
    pub fn new(config: Sm2Config) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AlgorithmObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &Sm2Config {
        &self.config
    }

    /// Fresh state for a concept the learner has never reviewed.
    pub fn new_state(&self) -> ReviewState {
        ReviewState::new(self.config.default_ease_factor)
    }

    pub fn calculate_next_review(
        &self,
        quality: u8,
        repetitions: u32,
        ease_factor: f64,
        interval_days: u32,
    ) -> Sm2Result {
        let quality = quality.min(MAX_QUALITY);
        let ease_factor = finite_or(ease_factor, self.config.default_ease_factor);

        let result = if quality < PASSING_QUALITY {
            Sm2Result {
                repetitions: 0,
                ease_factor,
                interval_days: RELEARN_INTERVAL_DAYS,
            }
        } else {
            let new_ease = self.next_ease_factor(ease_factor, quality);
            let new_repetitions = repetitions.saturating_add(1);
            let new_interval = match new_repetitions {
                1 => FIRST_INTERVAL_DAYS,
                2 => SECOND_INTERVAL_DAYS,
                _ => grow_interval(interval_days, new_ease),
            };

            Sm2Result {
                repetitions: new_repetitions,
                ease_factor: new_ease,
                interval_days: new_interval,
            }
        };

        self.observer
            .on_review_scheduled(quality, repetitions, ease_factor, &result);
        result
    }

    /// Apply one review to a stored state and stamp the review dates.
    pub fn review(&self, state: &ReviewState, quality: u8, now: DateTime<Utc>) -> ReviewState {
        let result = self.calculate_next_review(
            quality,
            state.repetitions,
            state.ease_factor,
            state.interval_days,
        );

        ReviewState {
            repetitions: result.repetitions,
            ease_factor: result.ease_factor,
            interval_days: result.interval_days,
            last_reviewed_at: Some(now),
            next_review_at: Some(next_review_at(now, result.interval_days)),
        }
    }

    /// Map a 0-100 understanding score onto SM-2 quality.
    pub fn understanding_to_quality(&self, understanding_score: f64) -> u8 {
        understanding_to_quality(understanding_score)
    }

    /// Today (UTC) plus `interval_days`.
    pub fn next_review_date(&self, interval_days: u32) -> NaiveDate {
        next_review_date(Utc::now().date_naive(), interval_days)
    }

    fn next_ease_factor(&self, ease_factor: f64, quality: u8) -> f64 {
        let miss = f64::from(MAX_QUALITY - quality);
        let adjusted = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        adjusted.max(self.config.min_ease_factor)
    }
}

impl Default for SpacedRepetitionScheduler {
    fn default() -> Self {
        Self::new(Sm2Config::default())
    }
}

pub fn understanding_to_quality(understanding_score: f64) -> u8 {
    let score = clamp_score(understanding_score);
    QUALITY_BANDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, quality)| *quality)
        .unwrap_or(0)
}

pub fn next_review_date(today: NaiveDate, interval_days: u32) -> NaiveDate {
    let days = interval_days.min(MAX_INTERVAL_DAYS);
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

pub fn next_review_at(from: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    let days = interval_days.min(MAX_INTERVAL_DAYS);
    from + Duration::days(i64::from(days))
}

fn grow_interval(previous_days: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(previous_days) * ease_factor).round();
    grown.clamp(f64::from(FIRST_INTERVAL_DAYS), f64::from(MAX_INTERVAL_DAYS)) as u32
}
