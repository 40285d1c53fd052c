// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation gate.
//!
//! Every inbound payload is checked against the schema for its resource kind
//! before any handler logic runs. Shape problems (missing fields, wrong JSON
//! types) are caught while deserializing; field constraints (lengths,
//! minimums, formats) come from the `validator` derives on the schema types.
//! Either way the caller receives a single [`ValidationFailure`] listing the
//! violations, ordered by field path.

pub mod extract;
pub mod numeric;
pub mod rules;

pub use extract::ValidatedJson;

use crate::models::{
    ChatMessage, GroupActivity, SignInRequest, UserRegistration, WorkoutLog, WorkoutPlan,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The six payload shapes accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    UserRegistration,
    SignIn,
    WorkoutPlan,
    WorkoutLog,
    GroupActivity,
    ChatMessage,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::UserRegistration,
        ResourceKind::SignIn,
        ResourceKind::WorkoutPlan,
        ResourceKind::WorkoutLog,
        ResourceKind::GroupActivity,
        ResourceKind::ChatMessage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::UserRegistration => "user_registration",
            ResourceKind::SignIn => "sign_in",
            ResourceKind::WorkoutPlan => "workout_plan",
            ResourceKind::WorkoutLog => "workout_log",
            ResourceKind::GroupActivity => "group_activity",
            ResourceKind::ChatMessage => "chat_message",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload type checked by the gate.
pub trait Schema: DeserializeOwned + Serialize + Validate + Send + 'static {
    const KIND: ResourceKind;
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Violation {
    /// Dotted field path, list positions in brackets (`exercise[0].reps`).
    /// Empty when the payload as a whole is malformed.
    pub path: String,
    pub reason: String,
}

/// Rejection of a whole payload. Never carries a partial value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} payload rejected with {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    pub kind: ResourceKind,
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    fn from_entries(kind: ResourceKind, mut entries: Vec<(Vec<Segment>, String)>) -> Self {
        // Stable sort keeps several reasons for one field in declaration order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let violations = entries
            .into_iter()
            .map(|(path, reason)| Violation {
                path: render_path(&path),
                reason,
            })
            .collect();
        Self { kind, violations }
    }

    /// First violation recorded for `path`, if any.
    pub fn violation_for(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path == path)
    }

    pub fn has_violation(&self, path: &str) -> bool {
        self.violation_for(path).is_some()
    }
}

/// Validate `payload` as `T`, returning the typed, normalized value.
pub fn validate<T: Schema>(payload: serde_json::Value) -> Result<T, ValidationFailure> {
    let result = check::<T>(payload);
    if let Err(failure) = &result {
        tracing::debug!(
            kind = %failure.kind,
            violations = failure.violations.len(),
            "Payload rejected by validation gate"
        );
    }
    result
}

/// Validate an untyped payload for `kind`.
///
/// On success the returned JSON has the schema's shape: numeric strings
/// coerced where the schema allows it, declared defaults filled in, unknown
/// keys dropped.
pub fn validate_payload(
    kind: ResourceKind,
    payload: serde_json::Value,
) -> Result<serde_json::Value, ValidationFailure> {
    match kind {
        ResourceKind::UserRegistration => normalize::<UserRegistration>(payload),
        ResourceKind::SignIn => normalize::<SignInRequest>(payload),
        ResourceKind::WorkoutPlan => normalize::<WorkoutPlan>(payload),
        ResourceKind::WorkoutLog => normalize::<WorkoutLog>(payload),
        ResourceKind::GroupActivity => normalize::<GroupActivity>(payload),
        ResourceKind::ChatMessage => normalize::<ChatMessage>(payload),
    }
}

fn normalize<T: Schema>(payload: serde_json::Value) -> Result<serde_json::Value, ValidationFailure> {
    let value = validate::<T>(payload)?;
    serde_json::to_value(&value).map_err(|err| {
        ValidationFailure::from_entries(
            T::KIND,
            vec![(Vec::new(), format!("could not normalize payload: {err}"))],
        )
    })
}

fn check<T: Schema>(mut payload: serde_json::Value) -> Result<T, ValidationFailure> {
    // Serde stops at the first mistyped value. Record it, prune it from the
    // payload and go again, so one bad field does not hide the others.
    let mut shape: Vec<(Vec<Segment>, String)> = Vec::new();
    let value: T = loop {
        match serde_path_to_error::deserialize(&payload) {
            Ok(value) => break value,
            Err(err) => {
                let (path, reason) = shape_violation(err);
                if shape.iter().any(|(seen, _)| *seen == path) {
                    return Err(ValidationFailure::from_entries(T::KIND, shape));
                }
                let pruned = prune(&mut payload, &path);
                shape.push((path, reason));
                if !pruned {
                    return Err(ValidationFailure::from_entries(T::KIND, shape));
                }
            }
        }
    };

    let mut entries = Vec::new();
    if let Err(errors) = value.validate() {
        collect_violations(&errors, &[], &mut entries);
    }
    // A pruned field reads as missing; its type error already covers it.
    entries.retain(|(path, _)| !shape.iter().any(|(bad, _)| path.starts_with(bad)));
    entries.append(&mut shape);

    if entries.is_empty() {
        Ok(value)
    } else {
        Err(ValidationFailure::from_entries(T::KIND, entries))
    }
}

/// Take the value at `path` out of the payload: object members are removed,
/// list items become `{}`. Returns false when nothing changed.
fn prune(payload: &mut serde_json::Value, path: &[Segment]) -> bool {
    let Some((last, parent_path)) = path.split_last() else {
        return false;
    };

    let mut parent = payload;
    for segment in parent_path {
        let next = match segment {
            Segment::Field(name) => parent.get_mut(name.as_str()),
            Segment::Index(index) => parent.get_mut(*index),
        };
        match next {
            Some(next) => parent = next,
            None => return false,
        }
    }

    match last {
        Segment::Field(name) => parent
            .as_object_mut()
            .and_then(|object| object.remove(name))
            .is_some(),
        Segment::Index(index) => match parent.get_mut(*index) {
            Some(item) if !matches!(&*item, serde_json::Value::Object(o) if o.is_empty()) => {
                *item = serde_json::Value::Object(serde_json::Map::new());
                true
            }
            _ => false,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Field(String),
    Index(usize),
}

fn render_path(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn shape_violation(err: serde_path_to_error::Error<serde_json::Error>) -> (Vec<Segment>, String) {
    let path = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            serde_path_to_error::Segment::Seq { index } => Some(Segment::Index(*index)),
            serde_path_to_error::Segment::Map { key } => Some(Segment::Field(key.clone())),
            serde_path_to_error::Segment::Enum { variant } => {
                Some(Segment::Field(variant.clone()))
            }
            _ => None,
        })
        .collect();

    (path, err.into_inner().to_string())
}

fn collect_violations(
    errors: &ValidationErrors,
    prefix: &[Segment],
    out: &mut Vec<(Vec<Segment>, String)>,
) {
    for (field, kind) in errors.errors() {
        let mut path = prefix.to_vec();
        path.push(Segment::Field(wire_name(field)));

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push((path.clone(), reason(error)));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let mut item_path = path.clone();
                    item_path.push(Segment::Index(*index));
                    collect_violations(nested, &item_path, out);
                }
            }
        }
    }
}

/// Schemas serialize with `rename_all = "camelCase"`; map field idents to
/// the names clients actually send.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn reason(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(format_param);

    match &*error.code {
        "required" => "is required".to_string(),
        "length" => match (param("equal"), param("min"), param("max")) {
            (Some(equal), _, _) => format!("must be exactly {equal} characters"),
            (None, Some(min), _) => format!("must be at least {min} characters"),
            (None, None, Some(max)) => format!("must be at most {max} characters"),
            _ => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), _) => format!("must be greater than or equal to {min}"),
            (None, Some(max)) => format!("must be less than or equal to {max}"),
            _ => "is out of range".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        other => format!("failed `{other}` check"),
    }
}

fn format_param(value: &serde_json::Value) -> String {
    match value.as_f64() {
        Some(number) if number.fract() == 0.0 => format!("{}", number as i64),
        Some(number) => number.to_string(),
        None => value.to_string(),
    }
}
