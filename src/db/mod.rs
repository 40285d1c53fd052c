// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer.
//!
//! Records live in process memory behind simple keyed lookups. Handlers only
//! ever see the `MemoryStore` methods, never the maps themselves.

pub mod memory;

pub use memory::{new_object_id, MemoryStore};
