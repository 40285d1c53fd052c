// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store backed by concurrent hash maps.
//!
//! Provides typed operations for:
//! - Users (accounts, with a case-insensitive email index)
//! - Plans, logs and group finder posts
//! - Chat messages
//! - Revoked sessions (signed-out JWT ids)

use crate::error::AppError;
use crate::models::{ChatEntry, GroupActivity, Record, User, WorkoutLog, WorkoutPlan};
use anyhow::anyhow;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;

/// Generate a 24-hex-character record id from 12 random bytes.
pub fn new_object_id() -> Result<String, AppError> {
    let mut bytes = [0u8; 12];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| anyhow!("system random source unavailable"))?;
    Ok(hex::encode(bytes))
}

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    /// Lowercased email -> user id
    emails: DashMap<String, String>,
    plans: DashMap<String, Record<WorkoutPlan>>,
    logs: DashMap<String, Record<WorkoutLog>>,
    groups: DashMap<String, Record<GroupActivity>>,
    messages: DashMap<String, Record<ChatEntry>>,
    /// JWT id -> token expiry (unix seconds)
    revoked_sessions: DashMap<String, i64>,
}

/// Shared handle to the store. Cloning is cheap and clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user, failing if the email is already registered.
    pub fn insert_user(&self, user: User) -> Result<(), AppError> {
        match self.inner.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                let id = user.id.clone();
                self.inner.users.insert(id.clone(), user);
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.inner.users.get(user_id).map(|user| user.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let id = self
            .inner
            .emails
            .get(&email.to_lowercase())
            .map(|id| id.value().clone())?;
        self.get_user(&id)
    }

    /// Stamp a successful sign-in.
    pub fn record_login(&self, user_id: &str, at: chrono::DateTime<chrono::Utc>) -> Option<User> {
        let mut user = self.inner.users.get_mut(user_id)?;
        user.lastlogin = Some(at);
        Some(user.value().clone())
    }

    // ─── Plan Operations ─────────────────────────────────────────

    pub fn insert_plan(&self, plan: WorkoutPlan) -> Result<Record<WorkoutPlan>, AppError> {
        let record = Record::new(new_object_id()?, plan);
        self.inner.plans.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    pub fn get_plan(&self, plan_id: &str) -> Option<Record<WorkoutPlan>> {
        self.inner.plans.get(plan_id).map(|plan| plan.value().clone())
    }

    /// All plans owned by `user_id`, oldest first.
    pub fn plans_for_user(&self, user_id: &str) -> Vec<Record<WorkoutPlan>> {
        collect_sorted(&self.inner.plans, |plan| plan.body.is_owned_by(user_id))
    }

    // ─── Log Operations ──────────────────────────────────────────

    pub fn insert_log(&self, log: WorkoutLog) -> Result<Record<WorkoutLog>, AppError> {
        let record = Record::new(new_object_id()?, log);
        self.inner.logs.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Logs recorded by `user_id`, oldest first. With `public_only`, private
    /// logs are left out.
    pub fn logs_for_user(&self, user_id: &str, public_only: bool) -> Vec<Record<WorkoutLog>> {
        collect_sorted(&self.inner.logs, |log| {
            log.body.is_owned_by(user_id) && (!public_only || log.body.is_public)
        })
    }

    // ─── Group Finder Operations ─────────────────────────────────

    pub fn insert_group(
        &self,
        activity: GroupActivity,
    ) -> Result<Record<GroupActivity>, AppError> {
        let record = Record::new(new_object_id()?, activity);
        self.inner.groups.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    pub fn list_groups(&self) -> Vec<Record<GroupActivity>> {
        collect_sorted(&self.inner.groups, |_| true)
    }

    // ─── Chat Operations ─────────────────────────────────────────

    /// Append a message, starting a new thread when `chat_id` is `None`.
    pub fn insert_message(
        &self,
        chat_id: Option<String>,
        user_id: &str,
        message: String,
    ) -> Result<Record<ChatEntry>, AppError> {
        let chat_id = match chat_id {
            Some(id) => id,
            None => new_object_id()?,
        };
        let record = Record::new(
            new_object_id()?,
            ChatEntry {
                chat_id,
                user_id: user_id.to_string(),
                message,
            },
        );
        self.inner
            .messages
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    // ─── Session Revocation ──────────────────────────────────────

    /// Remember a signed-out token id until the token would have expired anyway.
    pub fn revoke_session(&self, jti: &str, expires_at: i64) {
        let now = chrono::Utc::now().timestamp();
        self.inner.revoked_sessions.retain(|_, exp| *exp > now);
        self.inner
            .revoked_sessions
            .insert(jti.to_string(), expires_at);
    }

    pub fn is_session_revoked(&self, jti: &str) -> bool {
        self.inner.revoked_sessions.contains_key(jti)
    }
}

fn collect_sorted<T: Clone>(
    map: &DashMap<String, Record<T>>,
    keep: impl Fn(&Record<T>) -> bool,
) -> Vec<Record<T>> {
    let mut records: Vec<Record<T>> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    records.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
    records
}
