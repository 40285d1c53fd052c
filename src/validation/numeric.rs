// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Numeric field helpers for the schemas.
//!
//! Clients built on JavaScript have a single number type, so every numeric
//! field is an `f64`. Fields that declare coercion also accept numeric
//! strings (`"3"`), which form inputs tend to produce. On the way out, whole
//! numbers are written as JSON integers so a normalized `3` stays `3`.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;

/// Largest integer an IEEE double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A number accepted from either a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coerced(f64);

struct CoercedVisitor;

impl<'de> Visitor<'de> for CoercedVisitor {
    type Value = Coerced;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Coerced, E> {
        Ok(Coerced(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Coerced, E> {
        Ok(Coerced(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Coerced, E> {
        if v.is_finite() {
            Ok(Coerced(v))
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Coerced, E> {
        match v.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Coerced(number)),
            _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Coerced {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CoercedVisitor)
    }
}

/// Deserialize a coercible number for a field defaulting to 0. An explicit
/// `null` coerces to 0 as well, the way JavaScript's `Number(null)` does.
pub fn coerce<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<Coerced>::deserialize(deserializer)?.map_or(0.0, |c| c.0))
}

/// Deserialize an optional coercible number; `null` counts as absent.
pub fn coerce_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Coerced>::deserialize(deserializer)?.map(|c| c.0))
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn serialize_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(number) => serialize(number, serializer),
        None => serializer.serialize_none(),
    }
}
