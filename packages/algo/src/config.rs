//! Algorithm Configuration
//!
//! Thresholds, weights and bounds for the three components. A config is built
//! once (defaults, environment or JSON), validated, and handed to each
//! component at construction. Nothing here is global.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Defaults ====================

pub const DEFAULT_LOW_THRESHOLD: f64 = 40.0;
pub const DEFAULT_OPTIMAL_MIN: f64 = 50.0;
pub const DEFAULT_OPTIMAL_MAX: f64 = 75.0;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 85.0;

/// Fatigue starts accumulating after this many minutes
pub const DEFAULT_FATIGUE_ONSET_MINUTES: f64 = 20.0;
/// Minutes past onset until fatigue saturates
pub const DEFAULT_FATIGUE_RAMP_MINUTES: f64 = 40.0;

pub const DEFAULT_K_FACTOR: f64 = 32.0;
pub const DEFAULT_MIN_DIFFICULTY: f64 = 1.0;
pub const DEFAULT_MAX_DIFFICULTY: f64 = 10.0;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("config JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

// ==================== Cognitive Load ====================

/// Relative contribution of each load component. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWeights {
    pub time: f64,
    pub difficulty: f64,
    pub mastery: f64,
    pub hints: f64,
    pub fatigue: f64,
    pub performance: f64,
}

impl LoadWeights {
    pub fn sum(&self) -> f64 {
        self.time + self.difficulty + self.mastery + self.hints + self.fatigue + self.performance
    }

    fn as_array(&self) -> [f64; 6] {
        [
            self.time,
            self.difficulty,
            self.mastery,
            self.hints,
            self.fatigue,
            self.performance,
        ]
    }
}

impl Default for LoadWeights {
    fn default() -> Self {
        Self {
            time: 0.25,
            difficulty: 0.20,
            mastery: 0.20,
            hints: 0.15,
            fatigue: 0.10,
            performance: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadConfig {
    pub low_threshold: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub high_threshold: f64,
    pub fatigue_onset_minutes: f64,
    pub fatigue_ramp_minutes: f64,
    pub weights: LoadWeights,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            optimal_min: DEFAULT_OPTIMAL_MIN,
            optimal_max: DEFAULT_OPTIMAL_MAX,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            fatigue_onset_minutes: DEFAULT_FATIGUE_ONSET_MINUTES,
            fatigue_ramp_minutes: DEFAULT_FATIGUE_RAMP_MINUTES,
            weights: LoadWeights::default(),
        }
    }
}

impl LoadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [
            self.low_threshold,
            self.optimal_min,
            self.optimal_max,
            self.high_threshold,
        ];
        if ordered.iter().any(|t| !t.is_finite() || *t < 0.0 || *t > 100.0) {
            return Err(ConfigError::Invalid(
                "load thresholds must lie within [0, 100]".to_string(),
            ));
        }
        if ordered.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ConfigError::Invalid(format!(
                "load thresholds must be ordered low <= optimalMin <= optimalMax <= high, got {:?}",
                ordered
            )));
        }
        if !(self.fatigue_onset_minutes >= 0.0) || !(self.fatigue_ramp_minutes > 0.0) {
            return Err(ConfigError::Invalid(
                "fatigue onset must be >= 0 and ramp > 0".to_string(),
            ));
        }
        if self.weights.as_array().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "load weights must be non-negative".to_string(),
            ));
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "load weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

// ==================== Difficulty ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifficultyConfig {
    /// Elo sensitivity
    pub k_factor: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            min: DEFAULT_MIN_DIFFICULTY,
            max: DEFAULT_MAX_DIFFICULTY,
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.k_factor > 0.0) || !self.k_factor.is_finite() {
            return Err(ConfigError::Invalid("kFactor must be positive".to_string()));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigError::Invalid(format!(
                "difficulty bounds must satisfy min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Largest possible single-step change.
    pub fn max_step(&self) -> f64 {
        self.k_factor / 10.0
    }
}

// ==================== SM-2 ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sm2Config {
    pub min_ease_factor: f64,
    pub default_ease_factor: f64,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            min_ease_factor: MIN_EASE_FACTOR,
            default_ease_factor: DEFAULT_EASE_FACTOR,
        }
    }
}

impl Sm2Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_ease_factor > 0.0) || !self.min_ease_factor.is_finite() {
            return Err(ConfigError::Invalid(
                "minEaseFactor must be positive".to_string(),
            ));
        }
        if !self.default_ease_factor.is_finite() || self.default_ease_factor < self.min_ease_factor
        {
            return Err(ConfigError::Invalid(format!(
                "defaultEaseFactor {} is below minEaseFactor {}",
                self.default_ease_factor, self.min_ease_factor
            )));
        }
        Ok(())
    }
}

// ==================== Aggregate ====================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlgorithmConfig {
    pub load: LoadConfig,
    pub difficulty: DifficultyConfig,
    pub sm2: Sm2Config,
}

impl AlgorithmConfig {
    /// Defaults overlaid with any of the recognised environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let read = |key: &'static str, target: &mut f64| -> Result<(), ConfigError> {
            if let Some(raw) = lookup(key) {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(());
                }
                *target = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or(ConfigError::InvalidValue { key, value: raw })?;
            }
            Ok(())
        };

        read("COGNITIVE_LOAD_LOW", &mut config.load.low_threshold)?;
        read("COGNITIVE_LOAD_OPTIMAL_MIN", &mut config.load.optimal_min)?;
        read("COGNITIVE_LOAD_OPTIMAL_MAX", &mut config.load.optimal_max)?;
        read("COGNITIVE_LOAD_HIGH", &mut config.load.high_threshold)?;
        read(
            "COGNITIVE_LOAD_FATIGUE_ONSET",
            &mut config.load.fatigue_onset_minutes,
        )?;
        read(
            "COGNITIVE_LOAD_FATIGUE_RAMP",
            &mut config.load.fatigue_ramp_minutes,
        )?;
        read("DIFFICULTY_K_FACTOR", &mut config.difficulty.k_factor)?;
        read("DIFFICULTY_MIN", &mut config.difficulty.min)?;
        read("DIFFICULTY_MAX", &mut config.difficulty.max)?;
        read("SM2_MIN_EASE_FACTOR", &mut config.sm2.min_ease_factor)?;
        read(
            "SM2_DEFAULT_EASE_FACTOR",
            &mut config.sm2.default_ease_factor,
        )?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.load.validate()?;
        self.difficulty.validate()?;
        self.sm2.validate()?;
        Ok(())
    }
}
