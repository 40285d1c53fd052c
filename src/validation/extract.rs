// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Axum extractor that runs request bodies through the validation gate.

use super::{validate, Schema};
use crate::error::AppError;
use axum::extract::{FromRequest, Request};
use axum::Json;

/// A JSON body that has passed the gate for `T`.
///
/// Must be the last extractor of a handler since it consumes the body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Schema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(validate::<T>(payload)?))
    }
}
