// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the backend's identity endpoints.

use super::credentials::{CredentialStore, TOKEN_KEY, USER_ID_KEY};
use crate::middleware::auth::{SESSION_COOKIE, USER_ID_COOKIE};
use crate::models::{SignInRequest, UserProfile};
use anyhow::Context;
use axum_extra::extract::cookie::Cookie;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure to resolve or end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("sign-in response did not set a session cookie")]
    MissingSessionCookie,
}

impl SessionError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Transport(e) if e.is_timeout() => "timeout",
            SessionError::Transport(_) => "transport",
            SessionError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "unauthenticated"
            }
            SessionError::Status { .. } => "status",
            SessionError::MissingSessionCookie => "missing_cookie",
        }
    }
}

/// The two backend calls the session bootstrap depends on.
pub trait IdentityApi: Send + Sync + 'static {
    /// `GET /auth/me` with credentials.
    fn who_am_i(&self) -> impl Future<Output = Result<UserProfile, SessionError>> + Send;

    /// `POST /auth/signout` with credentials.
    fn sign_out(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct SessionClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl SessionClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Read `GYM_API_URL` (default `http://localhost:8080`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::new(
            std::env::var("GYM_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
        )
    }
}

/// [`IdentityApi`] over HTTP.
///
/// The session token lives in the credential store and is sent back as the
/// session cookie on every call, the way a browser would.
#[derive(Clone)]
pub struct HttpIdentityApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpIdentityApi {
    pub fn new(
        config: SessionClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed building session HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url,
            credentials,
        })
    }

    /// Sign in and remember the session. Follow with
    /// `SessionBootstrap::request_recheck` so the bootstrap picks it up.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let response = self
            .http
            .post(format!("{}/auth/signin", self.base_url))
            .json(&SignInRequest::new(email, password))
            .send()
            .await?;
        let response = check_response(response).await?;

        let mut token = None;
        for value in response.headers().get_all(SET_COOKIE) {
            let Some(cookie) = value.to_str().ok().and_then(|v| Cookie::parse(v).ok()) else {
                continue;
            };
            match cookie.name() {
                SESSION_COOKIE => token = Some(cookie.value().to_string()),
                USER_ID_COOKIE => self.credentials.set(USER_ID_KEY, cookie.value()),
                _ => {}
            }
        }
        let token = token.ok_or(SessionError::MissingSessionCookie)?;
        self.credentials.set(TOKEN_KEY, &token);

        let profile: UserProfile = response.json().await?;
        tracing::info!(user_id = %profile.id, "Signed in");
        Ok(profile)
    }

    /// Attach the stored session, if any.
    fn credentialed(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.get(TOKEN_KEY) {
            Some(token) => request.header(COOKIE, format!("{SESSION_COOKIE}={token}")),
            None => request,
        }
    }
}

impl IdentityApi for HttpIdentityApi {
    async fn who_am_i(&self) -> Result<UserProfile, SessionError> {
        let request = self.http.get(format!("{}/auth/me", self.base_url));
        let response = self.credentialed(request).send().await?;

        Ok(check_response(response).await?.json().await?)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let request = self.http.post(format!("{}/auth/signout", self.base_url));
        let response = self.credentialed(request).send().await?;

        check_response(response).await.map(|_| ())
    }
}

/// Pass through successful responses, turn the rest into `SessionError::Status`.
async fn check_response(response: Response) -> Result<Response, SessionError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SessionError::Status { status, body })
}
