// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend origin allowed by CORS, also decides cookie `Secure`
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session lifetime for both the JWT and its cookie
    pub session_ttl_days: i64,
    /// PBKDF2 rounds for password hashes
    pub password_iterations: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            session_ttl_days: 30,
            // Low on purpose: tests hash many passwords.
            password_iterations: 1_000,
        }
    }
}

impl Config {
    pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 210_000;

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?;
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SIGNING_KEY",
                reason: "must be at least 32 bytes".to_string(),
            });
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_or("PORT", 8080)?,
            jwt_signing_key: jwt_signing_key.into_bytes(),
            session_ttl_days: parse_or("SESSION_TTL_DAYS", 30)?,
            password_iterations: parse_or(
                "PASSWORD_ITERATIONS",
                Self::DEFAULT_PASSWORD_ITERATIONS,
            )?,
        })
    }

    /// Cookies are only marked `Secure` when the frontend is served over HTTPS,
    /// so local development over plain HTTP still works.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
