// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing with PBKDF2-HMAC-SHA256.
//!
//! Hashes are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with the
//! salt and hash in unpadded base64, so the iteration count can be raised
//! later without invalidating existing accounts.

use anyhow::{anyhow, Context};
use base64::{engine::general_purpose::STANDARD_NO_PAD as BASE64, Engine as _};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash `password` with a fresh random salt.
///
/// CPU-bound; call from `spawn_blocking` in async code.
pub fn hash_password(password: &str, iterations: u32) -> anyhow::Result<String> {
    let rounds = NonZeroU32::new(iterations).context("PBKDF2 iterations must be non-zero")?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| anyhow!("system random source unavailable"))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(ALGORITHM, rounds, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{SCHEME}${iterations}${}${}",
        BASE64.encode(salt),
        BASE64.encode(hash)
    ))
}

/// Check `password` against an encoded hash. Malformed hashes never verify.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some((rounds, salt, hash)) = decode(encoded) else {
        tracing::warn!("Stored password hash is malformed");
        return false;
    };

    pbkdf2::verify(ALGORITHM, rounds, &salt, password.as_bytes(), &hash).is_ok()
}

fn decode(encoded: &str) -> Option<(NonZeroU32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let rounds = parts.next()?.parse().ok().and_then(NonZeroU32::new)?;
    let salt = BASE64.decode(parts.next()?).ok()?;
    let hash = BASE64.decode(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((rounds, salt, hash))
}
