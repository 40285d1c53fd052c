// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log schema: one recorded session against a plan.
//!
//! Log payloads come straight from the in-workout screen, so most numeric
//! fields accept numeric strings and the screen's UI state is stored as-is.

use crate::validation::{numeric, ResourceKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub plan_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub workout_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub workout_session_id: Option<String>,
    #[validate(required, custom(function = "crate::validation::rules::iso_datetime"))]
    pub start_time: Option<String>,
    #[validate(required, custom(function = "crate::validation::rules::iso_datetime"))]
    pub completed_at: Option<String>,
    /// Seconds
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0))]
    pub duration: Option<f64>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce",
        serialize_with = "numeric::serialize"
    )]
    #[validate(range(min = 0.0))]
    pub current_exercise_index: f64,
    #[validate(required, nested)]
    pub completed_sets: Option<Vec<CompletedSet>>,
    /// Opaque UI state from the workout screen.
    #[serde(default = "empty_object")]
    pub set_inputs: Value,
    /// Opaque UI state from the workout screen.
    #[serde(default = "empty_object")]
    pub collapsed_exercises: Value,
    #[validate(required, nested)]
    pub exercises: Option<Vec<ExerciseSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutLog {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

impl Schema for WorkoutLog {
    const KIND: ResourceKind = ResourceKind::WorkoutLog;
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSet {
    #[validate(required, length(min = 1))]
    pub exercise_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt"
    )]
    #[validate(required, range(min = 1.0))]
    pub set_number: Option<f64>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt"
    )]
    #[validate(required, range(min = 0.0))]
    pub weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt"
    )]
    #[validate(required, range(min = 1.0))]
    pub reps: Option<f64>,
    #[validate(required, custom(function = "crate::validation::rules::iso_datetime"))]
    pub completed_at: Option<String>,
}

/// Per-exercise totals and the targets the plan set for it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    #[validate(required, length(min = 1))]
    pub exercise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce",
        serialize_with = "numeric::serialize"
    )]
    #[validate(range(min = 0.0))]
    pub total_sets_completed: f64,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 1.0))]
    pub planned_sets: Option<f64>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 1.0))]
    pub planned_reps: Option<f64>,
    #[serde(
        default,
        deserialize_with = "numeric::coerce_opt",
        serialize_with = "numeric::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0))]
    pub planned_weight: Option<f64>,
}
