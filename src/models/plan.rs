// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan schema.

use crate::validation::{numeric, ResourceKind, Schema};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's workout plan: an ordered list of exercises.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required)]
    pub name: Option<String>,
    #[validate(required)]
    pub is_public: Option<bool>,
    #[validate(required, nested)]
    pub exercise: Option<Vec<PlannedExercise>>,
}

impl WorkoutPlan {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    pub fn is_public(&self) -> bool {
        self.is_public.unwrap_or(false)
    }
}

impl Schema for WorkoutPlan {
    const KIND: ResourceKind = ResourceKind::WorkoutPlan;
}

/// Plan targets are strict numbers; no string coercion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    #[validate(required, length(min = 1))]
    pub exercise_id: Option<String>,
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub sets: Option<f64>,
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub reps: Option<f64>,
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub weight: Option<f64>,
    /// Rest between sets, in seconds
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub rest_time: Option<f64>,
}
