//! Session orchestration: one closed-loop step per answered question.
//!
//! understanding (external) -> cognitive load -> difficulty -> SM-2 review

use chrono::{DateTime, Utc};
use learnloop_algo::sanitize::{clamp_finite, clamp_score};
use learnloop_algo::spaced_repetition::PASSING_QUALITY;
use learnloop_algo::{
    expected_response_time, AlgorithmSuite, DifficultyAdjustment, DifficultyState,
    LoadAssessment, LoadFactors, LoadZone, ReviewStage, ReviewState,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::{
    ConceptKey, LearnerStore, ResponseRecord, SessionRecord, SessionStatus, TopicKey,
    TopicProgress,
};

/// Profile fields absent from a start request fall back to these, which
/// suggest the mid-scale difficulty 5.
const DEFAULT_USER_LEVEL: f64 = 10.0;
const DEFAULT_AVERAGE_PERFORMANCE: f64 = 70.0;

/// Share of a session's average understanding added to topic mastery.
const MASTERY_GAIN_RATE: f64 = 0.1;
const MAX_MASTERY: f64 = 100.0;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),
    #[error("session {id} is {status}")]
    InvalidStatus { id: Uuid, status: &'static str },
    #[error("session {id} already has {limit} responses")]
    QuestionLimitReached { id: Uuid, limit: usize },
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionInput {
    pub learner_id: String,
    pub topic_id: String,
    /// Explicit starting difficulty; skips the suggestion
    pub difficulty: Option<f64>,
    pub user_level: Option<f64>,
    pub topic_mastery: Option<f64>,
    pub average_performance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseInput {
    pub concept_id: Option<String>,
    pub understanding_score: f64,
    pub response_time_seconds: f64,
    #[serde(default)]
    pub hint_usage: u32,
    /// Overrides the topic mastery captured at session start
    pub user_mastery: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub learner_id: String,
    pub topic_id: String,
    pub status: SessionStatus,
    pub initial_difficulty: f64,
    pub current_difficulty: f64,
    pub consecutive_correct: u32,
    pub topic_mastery: f64,
    pub questions_completed: usize,
    pub active_seconds: i64,
    pub average_understanding: Option<f64>,
    pub average_cognitive_load: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    fn at(record: &SessionRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id,
            learner_id: record.learner_id.clone(),
            topic_id: record.topic_id.clone(),
            status: record.status,
            initial_difficulty: record.initial_difficulty,
            current_difficulty: record.difficulty.current_difficulty,
            consecutive_correct: record.consecutive_correct,
            topic_mastery: record.topic_mastery,
            questions_completed: record.responses.len(),
            active_seconds: record.active_seconds_at(now),
            average_understanding: record.average_understanding(),
            average_cognitive_load: record.average_cognitive_load(),
            started_at: record.started_at,
            completed_at: record.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptReview {
    pub concept_id: String,
    pub quality: u8,
    pub state: ReviewState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReview {
    pub concept_id: String,
    pub stage: ReviewStage,
    pub state: ReviewState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutcome {
    pub session_id: Uuid,
    pub cognitive_load: LoadAssessment,
    pub adjustment: DifficultyAdjustment,
    pub difficulty_adjusted: bool,
    pub review: Option<ConceptReview>,
    pub questions_completed: usize,
    pub should_continue: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    /// Active time only; pauses are excluded
    pub duration_seconds: i64,
    pub questions_completed: usize,
    pub average_understanding: f64,
    pub average_cognitive_load: f64,
    pub average_load_zone: LoadZone,
    pub initial_difficulty: f64,
    pub final_difficulty: f64,
    pub topic_progress: TopicProgress,
}

pub struct SessionService<'a> {
    suite: &'a AlgorithmSuite,
    store: &'a LearnerStore,
    max_questions: usize,
}

impl<'a> SessionService<'a> {
    pub fn new(suite: &'a AlgorithmSuite, store: &'a LearnerStore, max_questions: usize) -> Self {
        Self {
            suite,
            store,
            max_questions,
        }
    }

    pub fn start(
        &self,
        input: StartSessionInput,
        now: DateTime<Utc>,
    ) -> Result<SessionSnapshot, SessionError> {
        let learner_id = non_blank(input.learner_id, "learnerId")?;
        let topic_id = non_blank(input.topic_id, "topicId")?;
        let topic_mastery = match input.topic_mastery {
            Some(mastery) => clamp_score(mastery),
            None => self
                .store
                .topic_progress(&TopicKey::new(learner_id.clone(), topic_id.clone()))
                .map(|progress| progress.mastery_level)
                .unwrap_or(0.0),
        };

        let bounds = self.suite.difficulty.config();
        let initial_difficulty = match input.difficulty {
            Some(explicit) if explicit.is_finite() => clamp_finite(explicit, bounds.min, bounds.max),
            Some(_) => {
                return Err(SessionError::Validation(
                    "difficulty must be a finite number".to_string(),
                ))
            }
            None => f64::from(self.suite.difficulty.suggest_initial_difficulty(
                input.user_level.unwrap_or(DEFAULT_USER_LEVEL),
                topic_mastery,
                input
                    .average_performance
                    .unwrap_or(DEFAULT_AVERAGE_PERFORMANCE),
            )),
        };

        let record = SessionRecord {
            id: Uuid::new_v4(),
            learner_id,
            topic_id,
            status: SessionStatus::Active,
            topic_mastery,
            initial_difficulty,
            difficulty: DifficultyState::new(initial_difficulty),
            consecutive_correct: 0,
            started_at: now,
            completed_at: None,
            active_since: Some(now),
            active_seconds: 0,
            responses: Vec::new(),
        };
        let snapshot = SessionSnapshot::at(&record, now);
        self.store.insert_session(record);

        tracing::info!(
            session_id = %snapshot.id,
            learner_id = %snapshot.learner_id,
            difficulty = initial_difficulty,
            topic_mastery,
            "session started"
        );
        Ok(snapshot)
    }

    pub fn get(&self, session_id: Uuid, now: DateTime<Utc>) -> Result<SessionSnapshot, SessionError> {
        let entry = self
            .store
            .session(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let record = entry.lock();
        Ok(SessionSnapshot::at(&record, now))
    }

    pub fn list_for_learner(
        &self,
        learner_id: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<SessionSnapshot> {
        self.store
            .sessions_for_learner(learner_id, limit)
            .iter()
            .map(|record| SessionSnapshot::at(record, now))
            .collect()
    }

    pub fn topic_progress(&self, learner_id: &str) -> Vec<TopicProgress> {
        self.store.topics_for_learner(learner_id)
    }

    /// Runs load -> difficulty -> review for one answer while holding the
    /// session lock, so duplicate submissions are applied one after another.
    pub fn submit_response(
        &self,
        session_id: Uuid,
        input: SubmitResponseInput,
        now: DateTime<Utc>,
    ) -> Result<ResponseOutcome, SessionError> {
        if !input.understanding_score.is_finite() || !input.response_time_seconds.is_finite() {
            return Err(SessionError::Validation(
                "understandingScore and responseTimeSeconds must be finite numbers".to_string(),
            ));
        }
        let concept_id = match input.concept_id {
            Some(id) => Some(non_blank(id, "conceptId")?),
            None => None,
        };

        let entry = self
            .store
            .session(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = entry.lock();

        if session.status != SessionStatus::Active {
            return Err(SessionError::InvalidStatus {
                id: session_id,
                status: session.status.as_str(),
            });
        }
        if session.responses.len() >= self.max_questions {
            return Err(SessionError::QuestionLimitReached {
                id: session_id,
                limit: self.max_questions,
            });
        }

        let understanding = clamp_score(input.understanding_score);
        let difficulty_before = session.difficulty.current_difficulty;
        let active_minutes = session.active_seconds_at(now) as f64 / 60.0;

        let factors = LoadFactors {
            response_time_seconds: input.response_time_seconds,
            question_difficulty: difficulty_before,
            user_mastery: input.user_mastery.unwrap_or(session.topic_mastery),
            hint_usage: input.hint_usage,
            consecutive_correct: session.consecutive_correct,
            session_duration_minutes: active_minutes,
        };
        let cognitive_load = self.suite.load.assess(&factors);

        let (next_difficulty, adjustment) = self.suite.difficulty.adjust(
            &session.difficulty,
            understanding,
            f64::from(cognitive_load.load),
            input.response_time_seconds,
            expected_response_time(difficulty_before),
        );

        let quality = self.suite.scheduler.understanding_to_quality(understanding);
        let review = concept_id.as_ref().map(|concept_id| {
            let key = ConceptKey::new(session.learner_id.clone(), concept_id.clone());
            let slot = self
                .store
                .review_entry(&key, || self.suite.scheduler.new_state());
            let mut state = slot.lock();
            *state = self.suite.scheduler.review(&state, quality, now);
            ConceptReview {
                concept_id: concept_id.clone(),
                quality,
                state: state.clone(),
            }
        });

        session.consecutive_correct = if quality >= PASSING_QUALITY {
            session.consecutive_correct.saturating_add(1)
        } else {
            0
        };
        session.difficulty = next_difficulty;
        session.responses.push(ResponseRecord {
            concept_id,
            understanding_score: understanding,
            response_time_seconds: input.response_time_seconds,
            hint_usage: input.hint_usage,
            cognitive_load: cognitive_load.load,
            zone: cognitive_load.zone,
            difficulty_before,
            difficulty_after: next_difficulty.current_difficulty,
            answered_at: now,
        });

        let questions_completed = session.responses.len();
        let outcome = ResponseOutcome {
            session_id,
            cognitive_load,
            difficulty_adjusted: next_difficulty.current_difficulty != difficulty_before,
            adjustment,
            review,
            questions_completed,
            should_continue: questions_completed < self.max_questions,
        };

        tracing::debug!(
            session_id = %session_id,
            load = cognitive_load.load,
            zone = cognitive_load.zone.as_str(),
            direction = cognitive_load.recommendation.direction.as_str(),
            new_difficulty = adjustment.new_difficulty,
            reason = adjustment.reason.code(),
            "response processed"
        );
        Ok(outcome)
    }

    pub fn pause(&self, session_id: Uuid, now: DateTime<Utc>) -> Result<SessionSnapshot, SessionError> {
        self.transition(session_id, SessionStatus::Active, SessionStatus::Paused, now)
    }

    pub fn resume(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SessionSnapshot, SessionError> {
        self.transition(session_id, SessionStatus::Paused, SessionStatus::Active, now)
    }

    pub fn complete(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SessionSummary, SessionError> {
        let entry = self
            .store
            .session(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = entry.lock();

        if session.status == SessionStatus::Completed {
            return Err(SessionError::InvalidStatus {
                id: session_id,
                status: session.status.as_str(),
            });
        }

        session.bank_active_time(now);
        session.status = SessionStatus::Completed;
        session.completed_at = Some(now);

        let duration_seconds = session.active_seconds;
        let average_understanding = session.average_understanding().unwrap_or(0.0);
        let average_cognitive_load = session.average_cognitive_load().unwrap_or(0.0);

        let topic_key = TopicKey::new(session.learner_id.clone(), session.topic_id.clone());
        let topic_progress = {
            let slot = self.store.topic_entry(&topic_key);
            let mut progress = slot.lock();
            progress.mastery_level =
                (progress.mastery_level + average_understanding * MASTERY_GAIN_RATE).min(MAX_MASTERY);
            progress.time_spent_seconds += duration_seconds;
            progress.sessions_completed = progress.sessions_completed.saturating_add(1);
            progress.last_practiced_at = Some(now);
            progress.clone()
        };

        let summary = SessionSummary {
            session_id,
            duration_seconds,
            questions_completed: session.responses.len(),
            average_understanding,
            average_cognitive_load,
            average_load_zone: self.suite.load.zone_of(average_cognitive_load),
            initial_difficulty: session.initial_difficulty,
            final_difficulty: session.difficulty.current_difficulty,
            topic_progress,
        };

        tracing::info!(
            session_id = %session_id,
            questions = summary.questions_completed,
            average_understanding,
            topic_mastery = summary.topic_progress.mastery_level,
            "session completed"
        );
        Ok(summary)
    }

    pub fn due_reviews(&self, learner_id: &str, now: DateTime<Utc>) -> Vec<DueReview> {
        self.store
            .due_reviews(learner_id, now)
            .into_iter()
            .map(|(concept_id, state)| DueReview {
                concept_id,
                stage: state.stage(),
                state,
            })
            .collect()
    }

    fn transition(
        &self,
        session_id: Uuid,
        from: SessionStatus,
        to: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<SessionSnapshot, SessionError> {
        let entry = self
            .store
            .session(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = entry.lock();

        if session.status != from {
            return Err(SessionError::InvalidStatus {
                id: session_id,
                status: session.status.as_str(),
            });
        }
        match to {
            SessionStatus::Active => session.active_since = Some(now),
            SessionStatus::Paused | SessionStatus::Completed => session.bank_active_time(now),
        }
        session.status = to;
        Ok(SessionSnapshot::at(&session, now))
    }
}

fn non_blank(value: String, field: &str) -> Result<String, SessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SessionError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use learnloop_algo::DifficultyReason;

    fn start_input() -> StartSessionInput {
        StartSessionInput {
            learner_id: "ada".to_string(),
            topic_id: "fractions".to_string(),
            difficulty: None,
            user_level: None,
            topic_mastery: None,
            average_performance: None,
        }
    }

    fn answer(score: f64, concept: Option<&str>) -> SubmitResponseInput {
        SubmitResponseInput {
            concept_id: concept.map(str::to_string),
            understanding_score: score,
            response_time_seconds: 25.0,
            hint_usage: 0,
            user_mastery: None,
        }
    }

    #[test]
    fn test_start_defaults_to_mid_difficulty() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);

        let snapshot = service.start(start_input(), Utc::now()).unwrap();
        assert_eq!(snapshot.initial_difficulty, 5.0);
        assert_eq!(snapshot.status, SessionStatus::Active);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn test_start_uses_profile_or_explicit_difficulty() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);

        let suggested = service
            .start(
                StartSessionInput {
                    user_level: Some(10.0),
                    topic_mastery: Some(50.0),
                    average_performance: Some(85.0),
                    ..start_input()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(suggested.initial_difficulty, 7.0);

        let explicit = service
            .start(
                StartSessionInput {
                    difficulty: Some(14.0),
                    ..start_input()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(explicit.initial_difficulty, 10.0);
    }

    #[test]
    fn test_start_rejects_blank_ids() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);

        let err = service
            .start(
                StartSessionInput {
                    learner_id: "  ".to_string(),
                    ..start_input()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }

    #[test]
    fn test_strong_answers_raise_difficulty_and_schedule_review() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let started = Utc::now();
        let session = service.start(start_input(), started).unwrap();

        let outcome = service
            .submit_response(session.id, answer(92.0, Some("adding")), started + Duration::minutes(1))
            .unwrap();

        assert!(outcome.adjustment.new_difficulty > 5.0);
        assert!(outcome.difficulty_adjusted);
        assert!(outcome.adjustment.reason.is_increase());
        let review = outcome.review.unwrap();
        assert_eq!(review.quality, 5);
        assert_eq!(review.state.repetitions, 1);
        assert_eq!(review.state.stage(), ReviewStage::Learning);

        let snapshot = service.get(session.id, Utc::now()).unwrap();
        assert_eq!(snapshot.current_difficulty, outcome.adjustment.new_difficulty);
        assert_eq!(snapshot.consecutive_correct, 1);
        assert_eq!(snapshot.questions_completed, 1);
    }

    #[test]
    fn test_weak_answer_resets_streak_and_review() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let now = Utc::now();
        let session = service.start(start_input(), now).unwrap();

        service
            .submit_response(session.id, answer(95.0, Some("adding")), now)
            .unwrap();
        service
            .submit_response(session.id, answer(88.0, Some("adding")), now)
            .unwrap();
        let outcome = service
            .submit_response(session.id, answer(20.0, Some("adding")), now)
            .unwrap();

        assert_eq!(outcome.adjustment.reason, DifficultyReason::LowUnderstanding);
        let review = outcome.review.unwrap();
        assert_eq!(review.state.repetitions, 0);
        assert_eq!(review.state.interval_days, 1);
        assert_eq!(service.get(session.id, Utc::now()).unwrap().consecutive_correct, 0);
    }

    #[test]
    fn test_question_limit() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 2);
        let now = Utc::now();
        let session = service.start(start_input(), now).unwrap();

        let first = service.submit_response(session.id, answer(80.0, None), now).unwrap();
        assert!(first.should_continue);
        let second = service.submit_response(session.id, answer(80.0, None), now).unwrap();
        assert!(!second.should_continue);

        let err = service
            .submit_response(session.id, answer(80.0, None), now)
            .unwrap_err();
        assert!(matches!(err, SessionError::QuestionLimitReached { limit: 2, .. }));
    }

    #[test]
    fn test_paused_session_rejects_responses() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let now = Utc::now();
        let session = service.start(start_input(), now).unwrap();

        service.pause(session.id, now).unwrap();
        let err = service
            .submit_response(session.id, answer(80.0, None), now)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidStatus { status: "paused", .. }));

        assert!(service.pause(session.id, now).is_err());
        service.resume(session.id, now).unwrap();
        assert!(service.submit_response(session.id, answer(80.0, None), now).is_ok());
    }

    #[test]
    fn test_complete_summarizes() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let started = Utc::now();
        let session = service.start(start_input(), started).unwrap();

        service.submit_response(session.id, answer(90.0, None), started).unwrap();
        service.submit_response(session.id, answer(70.0, None), started).unwrap();

        let summary = service
            .complete(session.id, started + Duration::minutes(12))
            .unwrap();
        assert_eq!(summary.questions_completed, 2);
        assert_eq!(summary.duration_seconds, 720);
        assert!((summary.average_understanding - 80.0).abs() < 1e-9);
        assert_eq!(
            summary.average_load_zone,
            suite.load.zone_of(summary.average_cognitive_load)
        );

        assert!(matches!(
            service.complete(session.id, started).unwrap_err(),
            SessionError::InvalidStatus { status: "completed", .. }
        ));
        assert!(service.submit_response(session.id, answer(90.0, None), started).is_err());
    }

    #[test]
    fn test_completed_session_raises_topic_mastery_for_next_start() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let started = Utc::now();

        let first = service.start(start_input(), started).unwrap();
        assert_eq!(first.topic_mastery, 0.0);
        for _ in 0..3 {
            service
                .submit_response(first.id, answer(95.0, Some("adding")), started)
                .unwrap();
        }
        let summary = service
            .complete(first.id, started + Duration::minutes(6))
            .unwrap();
        assert!((summary.topic_progress.mastery_level - 9.5).abs() < 1e-9);
        assert_eq!(summary.topic_progress.time_spent_seconds, 360);
        assert_eq!(summary.topic_progress.sessions_completed, 1);

        let second = service
            .start(start_input(), started + Duration::hours(1))
            .unwrap();
        assert!((second.topic_mastery - 9.5).abs() < 1e-9);

        service
            .submit_response(second.id, answer(80.0, None), started + Duration::hours(1))
            .unwrap();
        let summary = service
            .complete(second.id, started + Duration::hours(1) + Duration::minutes(4))
            .unwrap();
        assert!((summary.topic_progress.mastery_level - 17.5).abs() < 1e-9);
        assert_eq!(summary.topic_progress.time_spent_seconds, 600);

        let other_topic = service
            .start(
                StartSessionInput {
                    topic_id: "decimals".to_string(),
                    ..start_input()
                },
                started,
            )
            .unwrap();
        assert_eq!(other_topic.topic_mastery, 0.0);
    }

    #[test]
    fn test_topic_mastery_capped_and_explicit_value_wins() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let now = Utc::now();
        store
            .topic_entry(&TopicKey::new("ada", "fractions"))
            .lock()
            .mastery_level = 95.0;

        let explicit = service
            .start(
                StartSessionInput {
                    topic_mastery: Some(30.0),
                    ..start_input()
                },
                now,
            )
            .unwrap();
        assert_eq!(explicit.topic_mastery, 30.0);

        service
            .submit_response(explicit.id, answer(90.0, None), now)
            .unwrap();
        let summary = service.complete(explicit.id, now).unwrap();
        assert_eq!(summary.topic_progress.mastery_level, 100.0);
        assert_eq!(service.topic_progress("ada").len(), 1);
    }

    #[test]
    fn test_paused_time_does_not_count_as_fatigue() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let t0 = Utc::now();

        let rested = service.start(start_input(), t0).unwrap();
        let steady = service.start(start_input(), t0).unwrap();
        let first = service
            .submit_response(rested.id, answer(80.0, None), t0 + Duration::minutes(1))
            .unwrap();
        service
            .submit_response(steady.id, answer(80.0, None), t0 + Duration::minutes(1))
            .unwrap();

        service.pause(rested.id, t0 + Duration::minutes(2)).unwrap();
        service.resume(rested.id, t0 + Duration::minutes(92)).unwrap();

        let after_break = service
            .submit_response(rested.id, answer(80.0, None), t0 + Duration::minutes(93))
            .unwrap();
        let unbroken = service
            .submit_response(steady.id, answer(80.0, None), t0 + Duration::minutes(3))
            .unwrap();
        assert_eq!(after_break.cognitive_load, unbroken.cognitive_load);

        let no_fatigue = suite.load.estimate_load(&LoadFactors {
            response_time_seconds: 25.0,
            question_difficulty: first.adjustment.new_difficulty,
            user_mastery: 0.0,
            hint_usage: 0,
            consecutive_correct: 1,
            session_duration_minutes: 0.0,
        });
        assert_eq!(after_break.cognitive_load.load, no_fatigue);
        let snapshot = service.get(rested.id, t0 + Duration::minutes(93)).unwrap();
        assert_eq!(snapshot.active_seconds, 180);

        let summary = service
            .complete(rested.id, t0 + Duration::minutes(95))
            .unwrap();
        assert_eq!(summary.duration_seconds, 300);
    }

    #[test]
    fn test_unknown_session() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let id = Uuid::new_v4();
        assert!(matches!(service.get(id, Utc::now()), Err(SessionError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_rejects_non_finite_scores() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let now = Utc::now();
        let session = service.start(start_input(), now).unwrap();

        let err = service
            .submit_response(session.id, answer(f64::NAN, None), now)
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }

    #[test]
    fn test_due_reviews_after_interval() {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 10);
        let now = Utc::now();
        let session = service.start(start_input(), now).unwrap();

        service
            .submit_response(session.id, answer(95.0, Some("adding")), now)
            .unwrap();
        assert!(service.due_reviews("ada", now).is_empty());

        let due = service.due_reviews("ada", now + Duration::days(1));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].concept_id, "adding");
        assert_eq!(due[0].stage, ReviewStage::Learning);
    }
}
