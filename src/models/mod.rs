// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.
//!
//! Request schemas double as the stored body of each record; a stored record
//! wraps the validated body with its id and creation time.

pub mod chat;
pub mod group;
pub mod log;
pub mod plan;
pub mod user;

pub use chat::{ChatEntry, ChatMessage};
pub use group::{Attendee, BodyPartTags, GroupActivity};
pub use log::{CompletedSet, ExerciseSummary, WorkoutLog};
pub use plan::{PlannedExercise, WorkoutPlan};
pub use user::{BodyStat, SignInRequest, User, UserProfile, UserRegistration};

use serde::Serialize;

/// A stored document: the validated body plus server-assigned fields.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: String,
    /// RFC 3339, millisecond precision
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Record<T> {
    pub fn new(id: String, body: T) -> Self {
        Self {
            id,
            created_at: crate::time_utils::now_rfc3339(),
            body,
        }
    }
}
