// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ChatEntry, ChatMessage, GroupActivity, Record, WorkoutLog, WorkoutPlan};
use crate::validation::ValidatedJson;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", post(create_plan).get(list_plans))
        .route("/plans/{plan_id}", get(get_plan))
        .route("/logs", post(create_log))
        .route("/logs/users/{user_id}", get(logs_for_user))
        .route("/groups", post(create_group).get(list_groups))
        .route("/chat/messages", post(post_message))
}

type Created<T> = (StatusCode, Json<Record<T>>);

/// Payloads carry their owner's id; it has to be the caller.
fn ensure_owner(auth: &AuthUser, owner: Option<&str>) -> Result<()> {
    if owner == Some(auth.user_id.as_str()) {
        Ok(())
    } else {
        tracing::warn!(user_id = %auth.user_id, owner = ?owner, "Payload owner mismatch");
        Err(AppError::Forbidden(
            "userId does not match the signed-in user".to_string(),
        ))
    }
}

// ─── Workout Plans ───────────────────────────────────────────

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(plan): ValidatedJson<WorkoutPlan>,
) -> Result<Created<WorkoutPlan>> {
    ensure_owner(&auth, plan.user_id.as_deref())?;

    let record = state.store.insert_plan(plan)?;
    tracing::info!(user_id = %auth.user_id, plan_id = %record.id, "Plan created");

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Json<Vec<Record<WorkoutPlan>>> {
    Json(state.store.plans_for_user(&auth.user_id))
}

/// A plan is visible to its owner, and to everyone once made public.
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> Result<Json<Record<WorkoutPlan>>> {
    state
        .store
        .get_plan(&plan_id)
        .filter(|plan| plan.body.is_public() || plan.body.is_owned_by(&auth.user_id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))
}

// ─── Workout Logs ────────────────────────────────────────────

/// Logs for one user, keyed the way existing clients read them.
#[derive(Serialize)]
pub struct LogsResponse {
    #[serde(rename = "Logs")]
    pub logs: Vec<Record<WorkoutLog>>,
}

async fn create_log(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(log): ValidatedJson<WorkoutLog>,
) -> Result<Created<WorkoutLog>> {
    ensure_owner(&auth, log.user_id.as_deref())?;

    let record = state.store.insert_log(log)?;
    tracing::info!(
        user_id = %auth.user_id,
        log_id = %record.id,
        public = record.body.is_public,
        "Workout logged"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// All of your own logs, or only the public ones of someone else.
async fn logs_for_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Json<LogsResponse> {
    let public_only = user_id != auth.user_id;
    Json(LogsResponse {
        logs: state.store.logs_for_user(&user_id, public_only),
    })
}

// ─── Group Finder ────────────────────────────────────────────

async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(activity): ValidatedJson<GroupActivity>,
) -> Result<Created<GroupActivity>> {
    let activity = activity.with_owner(&auth.user_id);
    ensure_owner(&auth, activity.user_id.as_deref())?;

    let record = state.store.insert_group(activity)?;
    tracing::info!(user_id = %auth.user_id, group_id = %record.id, "Group activity posted");

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_groups(State(state): State<Arc<AppState>>) -> Json<Vec<Record<GroupActivity>>> {
    Json(state.store.list_groups())
}

// ─── Chat ────────────────────────────────────────────────────

async fn post_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(message): ValidatedJson<ChatMessage>,
) -> Result<Created<ChatEntry>> {
    let text = message.message.unwrap_or_default();
    let record = state
        .store
        .insert_message(message.chat_id, &auth.user_id, text)?;

    tracing::debug!(
        user_id = %auth.user_id,
        chat_id = %record.body.chat_id,
        "Chat message stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}
