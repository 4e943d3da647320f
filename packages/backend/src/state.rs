use std::sync::Arc;
use std::time::{Instant, SystemTime};

use learnloop_algo::{AlgorithmSuite, TracingObserver};

use crate::services::session::SessionService;
use crate::store::LearnerStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    suite: Arc<AlgorithmSuite>,
    store: Arc<LearnerStore>,
    max_questions_per_session: usize,
}

impl AppState {
    /// Attaches the tracing observer so every algorithm decision is logged.
    pub fn new(suite: AlgorithmSuite, max_questions_per_session: usize) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            suite: Arc::new(suite.with_observer(Arc::new(TracingObserver))),
            store: Arc::new(LearnerStore::new()),
            max_questions_per_session,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn suite(&self) -> &AlgorithmSuite {
        &self.suite
    }

    pub fn store(&self) -> &LearnerStore {
        &self.store
    }

    pub fn sessions(&self) -> SessionService<'_> {
        SessionService::new(&self.suite, &self.store, self.max_questions_per_session)
    }
}
