// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use gym_tracker::config::Config;
use gym_tracker::db::{new_object_id, MemoryStore};
use gym_tracker::middleware::auth::create_jwt;
use gym_tracker::models::{User, UserRegistration};
use gym_tracker::routes::create_router;
use gym_tracker::services::hash_password;
use gym_tracker::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Password used for every seeded test user.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "password123";

/// Create a test app with an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config {
        frontend_url: frontend_url.to_string(),
        ..Config::default()
    })
}

fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        store: MemoryStore::new(),
    });

    (create_router(state.clone()), state)
}

/// Create a session token the middleware accepts.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key, 1).expect("Failed to create JWT")
}

/// Put a user straight into the store, bypassing sign-up.
#[allow(dead_code)]
pub fn seed_user(state: &AppState, email: &str) -> User {
    let registration: UserRegistration =
        serde_json::from_value(valid_registration(email)).expect("valid registration");
    let hash = hash_password(TEST_PASSWORD, state.config.password_iterations).unwrap();
    let user = User::register(new_object_id().unwrap(), registration, hash);
    state.store.insert_user(user.clone()).unwrap();
    user
}

/// JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Bodiless request, optionally with a bearer token.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ─── Payload Fixtures ────────────────────────────────────────

#[allow(dead_code)]
pub fn valid_registration(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "password": TEST_PASSWORD,
        "stats": [{"height": 170, "weight": 60, "age": 36}]
    })
}

#[allow(dead_code)]
pub fn valid_plan(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "name": "Push day",
        "isPublic": false,
        "exercise": [
            {"exerciseId": "x1", "sets": 3, "reps": 10, "weight": 50, "restTime": 60}
        ]
    })
}

#[allow(dead_code)]
pub fn valid_log(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "planId": "p1",
        "workoutId": "w1",
        "workoutSessionId": "s1",
        "startTime": "2025-03-01T10:00:00.000Z",
        "completedAt": "2025-03-01T11:00:00.000Z",
        "duration": 3600,
        "completedSets": [
            {
                "exerciseId": "x1",
                "setNumber": 1,
                "weight": 50,
                "reps": 10,
                "completedAt": "2025-03-01T10:05:00.000Z"
            }
        ],
        "setInputs": {"x1": {"0": {"weight": "50", "reps": "10"}}},
        "exercises": [
            {"exerciseId": "x1", "name": "Bench press", "totalSetsCompleted": 1, "plannedSets": 3}
        ]
    })
}

#[allow(dead_code)]
pub fn valid_group() -> Value {
    json!({
        "name": "Leg day crew",
        "description": "Squats then lunges",
        "gym": "Downtown Fitness",
        "time": "2025-03-01T18:00:00.000Z",
        "showWorkoutPlan": true,
        "workoutPlanId": "p1",
        "attendeesLimit": 4,
        "attendees": [{"userId": "u2", "status": "going"}],
        "bodyParts": [{"quads": "Quads", "glutes": "Glutes"}]
    })
}

#[allow(dead_code)]
pub fn valid_chat_message() -> Value {
    json!({"message": "Anyone up for deadlifts?"})
}
