// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account schemas and the stored user model.

use crate::validation::{numeric, ResourceKind, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Body measurements attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BodyStat {
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub height: Option<f64>,
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub weight: Option<f64>,
    #[validate(required, range(min = 1.0))]
    #[serde(serialize_with = "numeric::serialize_opt")]
    pub age: Option<f64>,
}

/// `POST /auth/signup` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    #[validate(
        required,
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    pub name: Option<String>,
    #[validate(required, email(message = "Must be a valid email"))]
    pub email: Option<String>,
    #[validate(required, length(min = 8))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[validate(required, nested)]
    pub stats: Option<Vec<BodyStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastlogin: Option<DateTime<Utc>>,
}

impl Schema for UserRegistration {
    const KIND: ResourceKind = ResourceKind::UserRegistration;
}

/// `POST /auth/signin` body: a registration without name and stats.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[validate(required, email(message = "Must be a valid email"))]
    pub email: Option<String>,
    #[validate(required, length(min = 8))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastlogin: Option<DateTime<Utc>>,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
            image: None,
            lastlogin: None,
        }
    }
}

impl Schema for SignInRequest {
    const KIND: ResourceKind = ResourceKind::SignIn;
}

/// Public view of a user, as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub stats: Vec<BodyStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastlogin: Option<DateTime<Utc>>,
}

/// Stored user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Encoded PBKDF2 hash, never serialized
    pub password_hash: String,
    pub image: Option<String>,
    pub stats: Vec<BodyStat>,
    pub lastlogin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new account from a registration that passed the gate.
    pub fn register(id: String, registration: UserRegistration, password_hash: String) -> Self {
        Self {
            id,
            name: registration.name.unwrap_or_default(),
            email: registration.email.unwrap_or_default(),
            password_hash,
            image: registration.image,
            stats: registration.stats.unwrap_or_default(),
            lastlogin: registration.lastlogin,
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            stats: self.stats.clone(),
            lastlogin: self.lastlogin,
        }
    }
}
