// ABOUTME: Session volume, per-exercise performance extraction and load progression
// ABOUTME: Works on the opaque exercise JSON objects clients send with a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use equilibria_core::constants::training::{
    DELOAD_FACTOR, EASY_RPE_MAX, EPLEY_REPS_DIVISOR, HARD_RPE_MIN, PROGRESSION_INCREMENT_KG,
};
use serde::Serialize;
use serde_json::Value;

use crate::round_one_decimal;

/// Exercise performance extracted from a completed-exercise object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceEntry {
    /// Exercise name
    pub exercise_name: String,
    /// Client catalogue id
    pub exercise_id: Option<String>,
    /// Working weight
    pub weight_kg: Option<f64>,
    /// Reps per set
    pub reps: i64,
    /// Number of sets
    pub sets: i64,
    /// Perceived exertion
    pub rpe: Option<i64>,
    /// Epley estimate
    pub estimated_1rm: Option<f64>,
    /// Load for next session
    pub suggested_next_weight: Option<f64>,
}

/// Total session volume: sum of `weight x reps x sets`
///
/// Only exercises carrying all three as numbers count. Returns `None` when
/// the total is zero so that bodyweight-only sessions store no volume.
#[must_use]
pub fn total_volume(exercises: &[Value]) -> Option<f64> {
    let total: f64 = exercises
        .iter()
        .filter_map(|exercise| {
            let weight = exercise.get("weight")?.as_f64()?;
            let reps = exercise.get("reps")?.as_f64()?;
            let sets = exercise.get("sets")?.as_f64()?;
            Some(weight * reps * sets)
        })
        .filter(|volume| volume.is_finite())
        .sum();

    (total > 0.0).then_some(total)
}

/// Build performance records from completed-exercise objects
///
/// An entry needs a name (`name` or `exercise_name`) and positive integer
/// `reps` and `sets`; anything else is skipped.
#[must_use]
pub fn extract_performances(exercises: &[Value]) -> Vec<PerformanceEntry> {
    exercises.iter().filter_map(performance_from_value).collect()
}

fn performance_from_value(exercise: &Value) -> Option<PerformanceEntry> {
    let exercise_name = ["name", "exercise_name"]
        .iter()
        .find_map(|key| exercise.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())?
        .to_owned();

    let reps = exercise.get("reps").and_then(as_count).filter(|r| *r > 0)?;
    let sets = exercise.get("sets").and_then(as_count).filter(|s| *s > 0)?;

    let weight_kg = ["weight", "weight_kg"]
        .iter()
        .find_map(|key| exercise.get(*key).and_then(Value::as_f64))
        .filter(|w| w.is_finite());
    let rpe = exercise.get("rpe").and_then(as_count);
    let exercise_id = exercise.get("exercise_id").and_then(|id| match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Some(PerformanceEntry {
        estimated_1rm: weight_kg.and_then(|w| estimate_one_rep_max(w, reps)),
        suggested_next_weight: suggest_next_weight(weight_kg, rpe),
        exercise_name,
        exercise_id,
        weight_kg,
        reps,
        sets,
        rpe,
    })
}

fn as_count(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

/// Epley one-rep-max estimate, `weight x (1 + reps / 30)`
///
/// A single rep is its own max.
#[must_use]
pub fn estimate_one_rep_max(weight_kg: f64, reps: i64) -> Option<f64> {
    if weight_kg <= 0.0 || reps <= 0 {
        return None;
    }
    if reps == 1 {
        return Some(weight_kg);
    }
    Some(round_one_decimal(
        weight_kg * (1.0 + reps as f64 / EPLEY_REPS_DIVISOR),
    ))
}

/// RPE-driven load for the next session
///
/// Easy sets (RPE 7 or less) add 2.5 kg, near-failure sets (RPE 9+) back
/// off by 5 %, RPE 8 holds the load.
#[must_use]
pub fn suggest_next_weight(weight_kg: Option<f64>, rpe: Option<i64>) -> Option<f64> {
    let weight = weight_kg.filter(|w| *w > 0.0)?;
    let rpe = rpe?;

    let next = if rpe <= EASY_RPE_MAX {
        weight + PROGRESSION_INCREMENT_KG
    } else if rpe >= HARD_RPE_MIN {
        weight * DELOAD_FACTOR
    } else {
        weight
    };
    Some(round_one_decimal(next))
}

/// Heaviest weight recorded per exercise name
#[must_use]
pub fn best_lifts<'a, I>(performances: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = (&'a str, Option<f64>)>,
{
    let mut bests: BTreeMap<String, f64> = BTreeMap::new();
    for (name, weight) in performances {
        let Some(weight) = weight.filter(|w| w.is_finite() && *w > 0.0) else {
            continue;
        };
        bests
            .entry(name.to_owned())
            .and_modify(|best| *best = best.max(weight))
            .or_insert(weight);
    }
    bests
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_volume_sums_complete_entries() {
        let exercises = vec![
            json!({"name": "Squat", "weight": 100, "reps": 5, "sets": 3}),
            json!({"name": "Bench", "weight": 60.5, "reps": 8, "sets": 2}),
            json!({"name": "Plank", "duration_seconds": 60}),
            json!({"name": "Row", "weight": null, "reps": 10, "sets": 3}),
        ];
        assert_eq!(total_volume(&exercises), Some(1500.0 + 968.0));
    }

    #[test]
    fn test_total_volume_none_when_zero() {
        assert_eq!(total_volume(&[]), None);
        assert_eq!(
            total_volume(&[json!({"name": "Pull-up", "weight": 0, "reps": 8, "sets": 3})]),
            None
        );
        assert_eq!(total_volume(&[json!("not an object")]), None);
    }

    #[test]
    fn test_extract_performances() {
        let exercises = vec![
            json!({"name": "Squat", "exercise_id": "sq-01", "weight": 100, "reps": 5, "sets": 3, "rpe": 7}),
            json!({"exercise_name": "Deadlift", "weight_kg": 140.0, "reps": 1, "sets": 1, "rpe": 9}),
            json!({"name": "Push-up", "reps": 20, "sets": 3}),
            json!({"name": "", "reps": 5, "sets": 5}),
            json!({"name": "Curl", "weight": 12, "reps": 0, "sets": 3}),
        ];

        let entries = extract_performances(&exercises);
        assert_eq!(entries.len(), 3);

        let squat = &entries[0];
        assert_eq!(squat.exercise_id.as_deref(), Some("sq-01"));
        assert_eq!(squat.estimated_1rm, Some(116.7));
        assert_eq!(squat.suggested_next_weight, Some(102.5));

        let deadlift = &entries[1];
        assert_eq!(deadlift.estimated_1rm, Some(140.0));
        assert_eq!(deadlift.suggested_next_weight, Some(133.0));

        let push_up = &entries[2];
        assert_eq!(push_up.weight_kg, None);
        assert_eq!(push_up.estimated_1rm, None);
        assert_eq!(push_up.suggested_next_weight, None);
    }

    #[test]
    fn test_rpe_eight_holds_load() {
        assert_eq!(suggest_next_weight(Some(80.0), Some(8)), Some(80.0));
        assert_eq!(suggest_next_weight(Some(80.0), None), None);
    }

    #[test]
    fn test_best_lifts() {
        let bests = best_lifts([
            ("Squat", Some(100.0)),
            ("Squat", Some(110.0)),
            ("Squat", Some(105.0)),
            ("Bench", None),
            ("Bench", Some(70.0)),
            ("Plank", None),
        ]);
        assert_eq!(bests.get("Squat"), Some(&110.0));
        assert_eq!(bests.get("Bench"), Some(&70.0));
        assert!(!bests.contains_key("Plank"));
    }
}
