//! Common Types
//!
//! Value records exchanged between the caller and the three algorithm
//! components. None of them are persisted here; the caller owns storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Cognitive Load Types ====================

/// Raw interaction telemetry for a single answered question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFactors {
    /// Seconds the learner took to answer
    pub response_time_seconds: f64,
    /// Question difficulty, 1-10
    pub question_difficulty: f64,
    /// Learner mastery of the topic, 0-100
    pub user_mastery: f64,
    /// Hints consumed, 0-3
    #[serde(default)]
    pub hint_usage: u32,
    /// Correct answers in a row before this one
    #[serde(default)]
    pub consecutive_correct: u32,
    /// Minutes since the session started
    #[serde(default)]
    pub session_duration_minutes: f64,
}

impl Default for LoadFactors {
    fn default() -> Self {
        Self {
            response_time_seconds: 0.0,
            question_difficulty: 5.0,
            user_mastery: 0.0,
            hint_usage: 0,
            consecutive_correct: 0,
            session_duration_minutes: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadZone {
    Low,
    Optimal,
    High,
    Overload,
}

impl LoadZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Optimal => "optimal",
            Self::High => "high",
            Self::Overload => "overload",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
    Maintain,
}

impl AdjustmentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
        }
    }
}

/// Whether the load calls for a difficulty change, and which way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRecommendation {
    pub adjust: bool,
    pub direction: AdjustmentDirection,
}

/// Load score together with its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadAssessment {
    pub load: u8,
    pub zone: LoadZone,
    pub recommendation: LoadRecommendation,
}

// ==================== Difficulty Types ====================

/// Difficulty carried by the caller between calls within a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyState {
    pub current_difficulty: f64,
}

impl DifficultyState {
    pub fn new(current_difficulty: f64) -> Self {
        Self { current_difficulty }
    }
}

/// Why the difficulty moved. The messages are shown to learners verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyReason {
    MatchesCurrentLevel,
    ExcellentPerformance,
    GoodUnderstanding,
    SlightIncrease,
    HighCognitiveLoad,
    LowUnderstanding,
    SlightDecrease,
}

impl DifficultyReason {
    pub const ALL: [DifficultyReason; 7] = [
        Self::MatchesCurrentLevel,
        Self::ExcellentPerformance,
        Self::GoodUnderstanding,
        Self::SlightIncrease,
        Self::HighCognitiveLoad,
        Self::LowUnderstanding,
        Self::SlightDecrease,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::MatchesCurrentLevel => "matches_current_level",
            Self::ExcellentPerformance => "excellent_performance",
            Self::GoodUnderstanding => "good_understanding",
            Self::SlightIncrease => "slight_increase",
            Self::HighCognitiveLoad => "high_cognitive_load",
            Self::LowUnderstanding => "low_understanding",
            Self::SlightDecrease => "slight_decrease",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MatchesCurrentLevel => "Performance matches current difficulty level",
            Self::ExcellentPerformance => {
                "Excellent performance with low cognitive load - increasing challenge"
            }
            Self::GoodUnderstanding => "Good understanding - gradually increasing difficulty",
            Self::SlightIncrease => "Slight increase to maintain optimal challenge",
            Self::HighCognitiveLoad => "High cognitive load detected - reducing difficulty",
            Self::LowUnderstanding => {
                "Low understanding - decreasing difficulty for better learning"
            }
            Self::SlightDecrease => "Slight decrease to optimize learning zone",
        }
    }

    pub fn is_increase(&self) -> bool {
        matches!(
            self,
            Self::ExcellentPerformance | Self::GoodUnderstanding | Self::SlightIncrease
        )
    }

    pub fn is_decrease(&self) -> bool {
        matches!(
            self,
            Self::HighCognitiveLoad | Self::LowUnderstanding | Self::SlightDecrease
        )
    }
}

impl std::fmt::Display for DifficultyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAdjustment {
    /// Clamped to the configured bounds, one decimal
    pub new_difficulty: f64,
    /// `new_difficulty - current_difficulty`
    pub change: f64,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: DifficultyReason,
}

fn serialize_reason<S>(reason: &DifficultyReason, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("DifficultyReason", 2)?;
    state.serialize_field("code", reason.code())?;
    state.serialize_field("message", reason.message())?;
    state.end()
}

// ==================== Spaced Repetition Types ====================

/// SM-2 schedule for one learner-concept pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
}

impl ReviewState {
    pub fn new(ease_factor: f64) -> Self {
        Self {
            repetitions: 0,
            ease_factor,
            interval_days: 0,
            last_reviewed_at: None,
            next_review_at: None,
        }
    }

    pub fn stage(&self) -> ReviewStage {
        match self.repetitions {
            0 => ReviewStage::New,
            1 | 2 => ReviewStage::Learning,
            _ => ReviewStage::Reviewing,
        }
    }

    /// Never-reviewed concepts are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_at {
            Some(at) => at <= now,
            None => true,
        }
    }
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EASE_FACTOR)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStage {
    New,
    Learning,
    Reviewing,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2Result {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
}
