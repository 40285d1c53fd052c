// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session routes: sign-up, sign-in, sign-out and "who am I".

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::config::Config;
use crate::db::new_object_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_jwt, decode_jwt, session_token, AuthUser, SESSION_COOKIE, USER_ID_COOKIE,
};
use crate::models::{SignInRequest, User, UserProfile, UserRegistration};
use crate::services::password::{hash_password, verify_password};
use crate::validation::ValidatedJson;
use crate::AppState;

/// Routes that work without a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
}

/// Routes that need a session; mounted behind `require_auth`.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

// ─── Cookies ─────────────────────────────────────────────────

/// Session cookie. HttpOnly so scripts never see the token.
fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::days(config.session_ttl_days))
        .build()
}

/// Readable user id cookie, for clients that key local state by user.
fn user_id_cookie(config: &Config, user_id: String) -> Cookie<'static> {
    Cookie::build((USER_ID_COOKIE, user_id))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::days(config.session_ttl_days))
        .build()
}

/// Turn a cookie into its removal form, keeping the attributes it was set with.
fn expired(mut cookie: Cookie<'static>) -> Cookie<'static> {
    cookie.set_value("");
    cookie.set_max_age(time::Duration::ZERO);
    cookie.set_expires(time::OffsetDateTime::UNIX_EPOCH);
    cookie
}

// ─── Handlers ────────────────────────────────────────────────

/// Register a new account. Does not sign the user in.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    ValidatedJson(mut registration): ValidatedJson<UserRegistration>,
) -> Result<impl IntoResponse> {
    let password = registration.password.take().unwrap_or_default();
    let iterations = state.config.password_iterations;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

    let user = User::register(new_object_id()?, registration, password_hash);
    let profile = user.profile();
    state.store.insert_user(user)?;

    tracing::info!(user_id = %profile.id, "User registered");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Check credentials and start a session.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<(CookieJar, Json<UserProfile>)> {
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let Some(user) = state.store.find_user_by_email(&email) else {
        tracing::info!("Sign-in for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let password_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !verified {
        tracing::info!(user_id = %user.id, "Sign-in with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let at = request.lastlogin.unwrap_or_else(chrono::Utc::now);
    let user = state.store.record_login(&user.id, at).unwrap_or(user);

    let token = create_jwt(
        &user.id,
        &state.config.jwt_signing_key,
        state.config.session_ttl_days,
    )?;

    tracing::info!(user_id = %user.id, "User signed in");

    let jar = jar
        .add(session_cookie(&state.config, token))
        .add(user_id_cookie(&state.config, user.id.clone()));

    Ok((jar, Json(user.profile())))
}

/// End the session: revoke the token if one was presented, and clear cookies.
///
/// Always succeeds, so a client can sign out even with an expired session.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (StatusCode, CookieJar) {
    if let Some(token) = session_token(&jar, &headers) {
        match decode_jwt(&token, &state.config.jwt_signing_key) {
            Ok(claims) => {
                state.store.revoke_session(&claims.jti, claims.exp as i64);
                tracing::info!(user_id = %claims.sub, "User signed out");
            }
            Err(_) => tracing::debug!("Sign-out with invalid token"),
        }
    }

    let jar = jar
        .add(expired(session_cookie(&state.config, String::new())))
        .add(expired(user_id_cookie(&state.config, String::new())));

    (StatusCode::NO_CONTENT, jar)
}

/// The signed-in user's profile.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let user = state.store.get_user(&auth.user_id).ok_or_else(|| {
        tracing::warn!(user_id = %auth.user_id, "Session for unknown user");
        AppError::Unauthorized
    })?;

    Ok(Json(user.profile()))
}
