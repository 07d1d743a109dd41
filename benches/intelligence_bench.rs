// ABOUTME: Criterion benchmarks for recovery scoring and training volume algorithms
// ABOUTME: Measures the pure computations that run on every check-in and session log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the intelligence crate.
//!
//! Covers recovery score calculation for both algorithms, session volume
//! extraction and the score window summary.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use equilibria_intelligence::{
    best_lifts, extract_performances, recommend_intensity, summarize_scores, total_volume,
    RecoveryInputs, RecoveryScoringAlgorithm, WearableSignals,
};
use serde_json::{json, Value};

const EXERCISE_NAMES: [&str; 6] = [
    "Squat",
    "Bench Press",
    "Deadlift",
    "Overhead Press",
    "Barbell Row",
    "Plank",
];

#[allow(clippy::cast_precision_loss)]
fn generate_exercises(count: usize) -> Vec<Value> {
    (0..count)
        .map(|index| {
            let name = EXERCISE_NAMES[index % EXERCISE_NAMES.len()];
            if name == "Plank" {
                json!({ "name": name, "duration_seconds": 60 })
            } else {
                json!({
                    "name": name,
                    "weight": 40.0 + (index % 12) as f64 * 5.0,
                    "reps": 5 + index % 6,
                    "sets": 3,
                    "rpe": 6 + index % 4,
                })
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn generate_scores(count: usize) -> Vec<f64> {
    (0..count)
        .map(|index| 1.0 + ((index * 37) % 90) as f64 / 10.0)
        .collect()
}

fn bench_recovery_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery_score");

    let inputs = RecoveryInputs {
        sleep_quality: Some(8.0),
        soreness_level: Some(3.0),
        energy_level: Some(8.0),
        stress_level: Some(4.0),
        sleep_hours: Some(7.5),
    };
    let signals = WearableSignals {
        hrv_rmssd: Some(45.0),
        resting_heart_rate: Some(58.0),
        sleep_hours: Some(8.0),
    };

    for algorithm in [
        RecoveryScoringAlgorithm::Weighted,
        RecoveryScoringAlgorithm::Legacy,
    ] {
        group.bench_with_input(
            BenchmarkId::new("with_wearable", algorithm),
            &algorithm,
            |b, algorithm| {
                b.iter(|| {
                    let score = algorithm.score(black_box(&inputs), black_box(&signals));
                    recommend_intensity(score)
                });
            },
        );
    }

    group.bench_function("defaults_only", |b| {
        let empty = RecoveryInputs::default();
        let none = WearableSignals::default();
        b.iter(|| RecoveryScoringAlgorithm::Weighted.score(black_box(&empty), black_box(&none)));
    });

    group.finish();
}

fn bench_session_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_processing");

    for size in [4_usize, 20, 100] {
        let exercises = generate_exercises(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("total_volume", size), &exercises, |b, ex| {
            b.iter(|| total_volume(black_box(ex)));
        });

        group.bench_with_input(
            BenchmarkId::new("extract_performances", size),
            &exercises,
            |b, ex| {
                b.iter(|| extract_performances(black_box(ex)));
            },
        );
    }

    let history: Vec<(String, Option<f64>)> = extract_performances(&generate_exercises(500))
        .into_iter()
        .map(|entry| (entry.exercise_name, entry.weight_kg))
        .collect();
    group.bench_function("best_lifts_500", |b| {
        b.iter(|| best_lifts(history.iter().map(|(name, w)| (name.as_str(), *w))));
    });

    group.finish();
}

fn bench_score_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_summary");

    for days in [7_usize, 30, 365] {
        let scores = generate_scores(days);
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &scores, |b, scores| {
            b.iter(|| summarize_scores(black_box(scores)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_recovery_score,
    bench_session_processing,
    bench_score_summary
);
criterion_main!(benches);
