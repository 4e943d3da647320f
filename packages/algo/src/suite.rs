//! The three components built from one configuration.

use std::sync::Arc;

use crate::cognitive_load::CognitiveLoadEstimator;
use crate::config::{AlgorithmConfig, ConfigError};
use crate::difficulty::DifficultyEngine;
use crate::observer::AlgorithmObserver;
use crate::spaced_repetition::SpacedRepetitionScheduler;

pub struct AlgorithmSuite {
    pub load: CognitiveLoadEstimator,
    pub difficulty: DifficultyEngine,
    pub scheduler: SpacedRepetitionScheduler,
}

impl AlgorithmSuite {
    /// Validates `config` before building anything.
    pub fn new(config: AlgorithmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let AlgorithmConfig {
            load,
            difficulty,
            sm2,
        } = config;

        Ok(Self {
            load: CognitiveLoadEstimator::new(load),
            difficulty: DifficultyEngine::new(difficulty),
            scheduler: SpacedRepetitionScheduler::new(sm2),
        })
    }

    pub fn with_observer(self, observer: Arc<dyn AlgorithmObserver>) -> Self {
        Self {
            load: self.load.with_observer(Arc::clone(&observer)),
            difficulty: self.difficulty.with_observer(Arc::clone(&observer)),
            scheduler: self.scheduler.with_observer(observer),
        }
    }
}

impl Default for AlgorithmSuite {
    fn default() -> Self {
        Self {
            load: CognitiveLoadEstimator::default(),
            difficulty: DifficultyEngine::default(),
            scheduler: SpacedRepetitionScheduler::default(),
        }
    }
}
