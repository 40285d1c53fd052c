// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group finder posts: an invitation to train together at a gym.

use crate::validation::{numeric, ResourceKind, Schema};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GroupActivity {
    /// Usually omitted by clients; the handler fills it from the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub gym: Option<String>,
    #[validate(required)]
    pub time: Option<String>,
    #[validate(required)]
    pub show_workout_plan: Option<bool>,
    #[validate(required, length(min = 1))]
    pub workout_plan_id: Option<String>,
    #[serde(alias = "attendeessLimit", serialize_with = "numeric::serialize_opt")]
    #[validate(required, range(min = 1.0))]
    pub attendees_limit: Option<f64>,
    #[serde(alias = "attendess")]
    #[validate(required, nested)]
    pub attendees: Option<Vec<Attendee>>,
    #[validate(required)]
    pub body_parts: Option<Vec<BodyPartTags>>,
}

impl GroupActivity {
    /// Attribute the post to `user_id` unless the payload already names an owner.
    pub fn with_owner(mut self, user_id: &str) -> Self {
        if self.user_id.is_none() {
            self.user_id = Some(user_id.to_string());
        }
        self
    }
}

impl Schema for GroupActivity {
    const KIND: ResourceKind = ResourceKind::GroupActivity;
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    /// Free-form, e.g. "going" or "maybe"
    #[validate(required, length(min = 1))]
    pub status: Option<String>,
}

/// Targeted muscle groups, each with an optional display label.
///
/// Key spellings match what existing clients send, including a few
/// misspellings that have to be kept for compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abductors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adductors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biceps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calves: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardiovascular_system: Option<String>,
    #[serde(rename = "deltes", default, skip_serializing_if = "Option::is_none")]
    pub delts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forearms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glutes: Option<String>,
    #[serde(rename = "hamStrings", default, skip_serializing_if = "Option::is_none")]
    pub hamstrings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lats: Option<String>,
    #[serde(
        rename = "levatorScapule",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub levator_scapulae: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pectorals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quads: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serratus_anterior: Option<String>,
    #[serde(rename = "spin", default, skip_serializing_if = "Option::is_none")]
    pub spine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triceps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_back: Option<String>,
}
