// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym-Tracker: workout plans, logs and training partners
//!
//! This crate provides the backend API (request validation gate, auth and
//! resource routes) and the client-side session bootstrap that front ends
//! embed to learn who is signed in.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::MemoryStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: MemoryStore,
}
