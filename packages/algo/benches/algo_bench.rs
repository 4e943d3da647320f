//! Benchmark suite for learnloop-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use learnloop_algo::{AlgorithmSuite, LoadFactors};

fn bench_estimate_load(c: &mut Criterion) {
    let suite = AlgorithmSuite::default();
    let factors = LoadFactors {
        response_time_seconds: 45.0,
        question_difficulty: 6.0,
        user_mastery: 40.0,
        hint_usage: 1,
        consecutive_correct: 2,
        session_duration_minutes: 35.0,
    };
    c.bench_function("CognitiveLoadEstimator::assess", |b| {
        b.iter(|| suite.load.assess(black_box(&factors)))
    });
}

fn bench_adjust_difficulty(c: &mut Criterion) {
    let suite = AlgorithmSuite::default();
    c.bench_function("DifficultyEngine::adjust_difficulty", |b| {
        b.iter(|| {
            suite.difficulty.adjust_difficulty(
                black_box(5.0),
                black_box(82.0),
                black_box(55.0),
                black_box(40.0),
                black_box(80.0),
            )
        })
    });
}

fn bench_review_sequence(c: &mut Criterion) {
    let suite = AlgorithmSuite::default();
    c.bench_function("SpacedRepetitionScheduler::calculate_next_review x10", |b| {
        b.iter(|| {
            let mut result = suite.scheduler.calculate_next_review(4, 0, 2.5, 0);
            for _ in 0..9 {
                result = suite.scheduler.calculate_next_review(
                    black_box(4),
                    result.repetitions,
                    result.ease_factor,
                    result.interval_days,
                );
            }
            result
        })
    });
}

criterion_group!(
    benches,
    bench_estimate_load,
    bench_adjust_difficulty,
    bench_review_sequence
);
criterion_main!(benches);
