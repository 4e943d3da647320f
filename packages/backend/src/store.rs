//! In-memory learner state.
//!
//! Sessions and review schedules are read-modify-written across requests, so
//! every record sits behind its own mutex. The maps only hand out `Arc`s to
//! those records; callers lock the record for the whole update. The session
//! lock is always taken before a concept or topic lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use learnloop_algo::{DifficultyState, LoadZone, ReviewState};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub concept_id: Option<String>,
    pub understanding_score: f64,
    pub response_time_seconds: f64,
    pub hint_usage: u32,
    pub cognitive_load: u8,
    pub zone: LoadZone,
    pub difficulty_before: f64,
    pub difficulty_after: f64,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub learner_id: String,
    pub topic_id: String,
    pub status: SessionStatus,
    pub topic_mastery: f64,
    pub initial_difficulty: f64,
    pub difficulty: DifficultyState,
    pub consecutive_correct: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Start of the current active stretch; `None` while paused or completed
    pub active_since: Option<DateTime<Utc>>,
    /// Active seconds banked by earlier stretches
    pub active_seconds: i64,
    pub responses: Vec<ResponseRecord>,
}

impl SessionRecord {
    /// Seconds spent active up to `now`, excluding pauses.
    pub fn active_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        let running = self
            .active_since
            .map(|since| (now - since).num_seconds().max(0))
            .unwrap_or(0);
        self.active_seconds + running
    }

    /// Closes the running stretch, if any, into `active_seconds`.
    pub fn bank_active_time(&mut self, now: DateTime<Utc>) {
        self.active_seconds = self.active_seconds_at(now);
        self.active_since = None;
    }

    pub fn average_understanding(&self) -> Option<f64> {
        average(self.responses.iter().map(|r| r.understanding_score))
    }

    pub fn average_cognitive_load(&self) -> Option<f64> {
        average(self.responses.iter().map(|r| f64::from(r.cognitive_load)))
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConceptKey {
    pub learner_id: String,
    pub concept_id: String,
}

impl ConceptKey {
    pub fn new(learner_id: impl Into<String>, concept_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            concept_id: concept_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicKey {
    pub learner_id: String,
    pub topic_id: String,
}

impl TopicKey {
    pub fn new(learner_id: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            topic_id: topic_id.into(),
        }
    }
}

/// Mastery carried across sessions on one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic_id: String,
    /// 0-100
    pub mastery_level: f64,
    pub time_spent_seconds: i64,
    pub sessions_completed: u32,
    pub last_practiced_at: Option<DateTime<Utc>>,
}

impl TopicProgress {
    pub fn new(topic_id: impl Into<String>) -> Self {
        Self {
            topic_id: topic_id.into(),
            mastery_level: 0.0,
            time_spent_seconds: 0,
            sessions_completed: 0,
            last_practiced_at: None,
        }
    }
}

#[derive(Default)]
pub struct LearnerStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionRecord>>>>,
    reviews: RwLock<HashMap<ConceptKey, Arc<Mutex<ReviewState>>>>,
    topics: RwLock<HashMap<TopicKey, Arc<Mutex<TopicProgress>>>>,
}

impl LearnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_session(&self, record: SessionRecord) -> Arc<Mutex<SessionRecord>> {
        let id = record.id;
        let entry = Arc::new(Mutex::new(record));
        self.sessions.write().insert(id, Arc::clone(&entry));
        entry
    }

    pub fn session(&self, id: &Uuid) -> Option<Arc<Mutex<SessionRecord>>> {
        self.sessions.read().get(id).cloned()
    }

    /// Snapshots of a learner's `limit` most recent sessions, newest first.
    pub fn sessions_for_learner(&self, learner_id: &str, limit: usize) -> Vec<SessionRecord> {
        let entries: Vec<_> = self.sessions.read().values().cloned().collect();
        let mut sessions: Vec<SessionRecord> = entries
            .iter()
            .map(|entry| entry.lock())
            .filter(|record| record.learner_id == learner_id)
            .map(|record| record.clone())
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit);
        sessions
    }

    /// Review slot for a learner-concept pair, created with `init` on first use.
    pub fn review_entry<F>(&self, key: &ConceptKey, init: F) -> Arc<Mutex<ReviewState>>
    where
        F: FnOnce() -> ReviewState,
    {
        if let Some(entry) = self.reviews.read().get(key) {
            return Arc::clone(entry);
        }
        let mut reviews = self.reviews.write();
        Arc::clone(
            reviews
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(init()))),
        )
    }

    pub fn review(&self, key: &ConceptKey) -> Option<ReviewState> {
        let entry = self.reviews.read().get(key).cloned()?;
        let state = entry.lock().clone();
        Some(state)
    }

    /// Concepts due at `now`, most overdue first.
    pub fn due_reviews(&self, learner_id: &str, now: DateTime<Utc>) -> Vec<(String, ReviewState)> {
        let entries: Vec<(String, Arc<Mutex<ReviewState>>)> = self
            .reviews
            .read()
            .iter()
            .filter(|(key, _)| key.learner_id == learner_id)
            .map(|(key, entry)| (key.concept_id.clone(), Arc::clone(entry)))
            .collect();

        let mut due: Vec<(String, ReviewState)> = entries
            .into_iter()
            .map(|(concept_id, entry)| (concept_id, entry.lock().clone()))
            .filter(|(_, state)| state.is_due(now))
            .collect();
        due.sort_by(|a, b| {
            a.1.next_review_at
                .cmp(&b.1.next_review_at)
                .then_with(|| a.0.cmp(&b.0))
        });
        due
    }

    /// Progress slot for a learner-topic pair, created empty on first use.
    pub fn topic_entry(&self, key: &TopicKey) -> Arc<Mutex<TopicProgress>> {
        if let Some(entry) = self.topics.read().get(key) {
            return Arc::clone(entry);
        }
        let mut topics = self.topics.write();
        Arc::clone(
            topics
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(TopicProgress::new(key.topic_id.clone())))),
        )
    }

    pub fn topic_progress(&self, key: &TopicKey) -> Option<TopicProgress> {
        let entry = self.topics.read().get(key).cloned()?;
        let progress = entry.lock().clone();
        Some(progress)
    }

    /// A learner's topics, most recently practiced first.
    pub fn topics_for_learner(&self, learner_id: &str) -> Vec<TopicProgress> {
        let entries: Vec<_> = self
            .topics
            .read()
            .iter()
            .filter(|(key, _)| key.learner_id == learner_id)
            .map(|(_, entry)| Arc::clone(entry))
            .collect();

        let mut topics: Vec<TopicProgress> =
            entries.iter().map(|entry| entry.lock().clone()).collect();
        topics.sort_by(|a, b| {
            b.last_practiced_at
                .cmp(&a.last_practiced_at)
                .then_with(|| a.topic_id.cmp(&b.topic_id))
        });
        topics
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
