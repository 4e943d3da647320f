//! # learnloop-algo - adaptive learning control loop
//!
//! Pure Rust implementations of the three algorithms that drive a learning
//! session:
//!
//! - **Cognitive Load Estimator** - telemetry to a 0-100 load score and zone
//! - **Adaptive Difficulty Engine** - Elo-style expected vs. actual performance
//! - **Spaced Repetition Scheduler** - SM-2 review intervals
//!
//! Each component is a pure function of its inputs plus an immutable
//! configuration. State (current difficulty, review schedules) belongs to the
//! caller, which must serialize read-modify-write per learner key.
//!
//! ## Module structure
//!
//! - [`cognitive_load`] - load estimation, zones, adjustment direction
//! - [`difficulty`] - difficulty adjustment and initial suggestion
//! - [`spaced_repetition`] - SM-2 scheduling and quality mapping
//! - [`config`] - thresholds, weights, bounds; env and JSON loading
//! - [`observer`] - optional instrumentation hook
//! - [`sanitize`] - clamping of noisy numeric input
//! - [`types`] - shared records
//!
//! ## Example
//!
//! ```rust
//! use learnloop_algo::{AlgorithmSuite, LoadFactors, LoadZone};
//!
//! let suite = AlgorithmSuite::default();
//!
//! let load = suite.load.estimate_load(&LoadFactors {
//!     response_time_seconds: 30.0,
//!     question_difficulty: 5.0,
//!     user_mastery: 50.0,
//!     hint_usage: 0,
//!     consecutive_correct: 0,
//!     session_duration_minutes: 10.0,
//! });
//! assert_eq!(suite.load.zone_of(load), LoadZone::Low);
//!
//! let adjustment = suite.difficulty.adjust_difficulty(5.0, 90.0, load as f64, 20.0, 30.0);
//! assert!(adjustment.new_difficulty > 5.0);
//!
//! let quality = suite.scheduler.understanding_to_quality(90.0);
//! let review = suite.scheduler.calculate_next_review(quality, 0, 2.5, 0);
//! assert_eq!(review.interval_days, 1);
//! ```

pub mod cognitive_load;
pub mod config;
pub mod difficulty;
pub mod observer;
pub mod sanitize;
pub mod spaced_repetition;
pub mod suite;
pub mod types;

pub use types::*;

pub use cognitive_load::{expected_response_time, CognitiveLoadEstimator};
pub use config::{
    AlgorithmConfig, ConfigError, DifficultyConfig, LoadConfig, LoadWeights, Sm2Config,
};
pub use difficulty::DifficultyEngine;
pub use observer::{AlgorithmObserver, NoopObserver, TracingObserver};
pub use spaced_repetition::{understanding_to_quality, SpacedRepetitionScheduler};
pub use suite::AlgorithmSuite;
