//! Property-based tests for session orchestration
//!
//! Drives the session service with arbitrary answer sequences and checks the
//! state it carries between questions.

use chrono::{Duration, TimeZone, Utc};
use learnloop_algo::AlgorithmSuite;
use learnloop_backend::services::session::{
    SessionService, StartSessionInput, SubmitResponseInput,
};
use learnloop_backend::store::{ConceptKey, LearnerStore};
use proptest::prelude::*;

const MAX_QUESTIONS: usize = 12;

// ==================== Arbitrary Generators ====================

#[derive(Debug, Clone)]
struct Answer {
    understanding: f64,
    response_time: f64,
    hints: u32,
    concept: usize,
}

fn arb_answer() -> impl Strategy<Value = Answer> {
    (0.0f64..=100.0, 1.0f64..=300.0, 0u32..=5, 0usize..3).prop_map(
        |(understanding, response_time, hints, concept)| Answer {
            understanding,
            response_time,
            hints,
            concept,
        },
    )
}

fn arb_answers() -> impl Strategy<Value = Vec<Answer>> {
    prop::collection::vec(arb_answer(), 1..=MAX_QUESTIONS)
}

fn start(service: &SessionService<'_>, difficulty: Option<f64>) -> uuid::Uuid {
    let start_time = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
    service
        .start(
            StartSessionInput {
                learner_id: "ada".to_string(),
                topic_id: "fractions".to_string(),
                difficulty,
                user_level: None,
                topic_mastery: Some(40.0),
                average_performance: None,
            },
            start_time,
        )
        .unwrap()
        .id
}

fn submit(answer: &Answer) -> SubmitResponseInput {
    SubmitResponseInput {
        concept_id: Some(format!("concept-{}", answer.concept)),
        understanding_score: answer.understanding,
        response_time_seconds: answer.response_time,
        hint_usage: answer.hints,
        user_mastery: None,
    }
}

// ==================== Properties ====================

proptest! {
    #[test]
    fn prop_difficulty_stays_in_bounds(
        start_difficulty in 1.0f64..=10.0,
        answers in arb_answers(),
    ) {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, MAX_QUESTIONS);
        let id = start(&service, Some(start_difficulty));
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        for (i, answer) in answers.iter().enumerate() {
            let now = base + Duration::minutes(i as i64 * 3);
            let outcome = service.submit_response(id, submit(answer), now).unwrap();

            prop_assert!(outcome.cognitive_load.load <= 100);
            let difficulty = outcome.adjustment.new_difficulty;
            prop_assert!((1.0..=10.0).contains(&difficulty));
            prop_assert!(((difficulty * 10.0).round() - difficulty * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_streak_counts_trailing_passes(answers in arb_answers()) {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, MAX_QUESTIONS);
        let id = start(&service, None);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 5, 0).unwrap();

        for answer in &answers {
            service.submit_response(id, submit(answer), now).unwrap();
        }

        let expected = answers
            .iter()
            .rev()
            .take_while(|a| a.understanding >= 70.0)
            .count() as u32;
        prop_assert_eq!(service.get(id, now).unwrap().consecutive_correct, expected);
    }

    #[test]
    fn prop_review_state_matches_last_answer(answers in arb_answers()) {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, MAX_QUESTIONS);
        let id = start(&service, None);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 5, 0).unwrap();

        for answer in &answers {
            let outcome = service.submit_response(id, submit(answer), now).unwrap();
            let review = outcome.review.unwrap();

            prop_assert!(review.state.ease_factor >= 1.3 - 1e-9);
            prop_assert!(review.state.interval_days >= 1);
            if review.quality < 3 {
                prop_assert_eq!(review.state.repetitions, 0);
                prop_assert_eq!(review.state.interval_days, 1);
            }

            let key = ConceptKey::new("ada", review.concept_id.clone());
            prop_assert_eq!(store.review(&key), Some(review.state));
        }
    }

    #[test]
    fn prop_question_limit_enforced(extra in 1usize..4) {
        let suite = AlgorithmSuite::default();
        let store = LearnerStore::new();
        let service = SessionService::new(&suite, &store, 4);
        let id = start(&service, None);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 5, 0).unwrap();
        let answer = Answer { understanding: 80.0, response_time: 40.0, hints: 0, concept: 0 };

        let mut accepted = 0;
        for _ in 0..(4 + extra) {
            if service.submit_response(id, submit(&answer), now).is_ok() {
                accepted += 1;
            }
        }
        prop_assert_eq!(accepted, 4);
        prop_assert_eq!(service.get(id, now).unwrap().questions_completed, 4);
    }
}
