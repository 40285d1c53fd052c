// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side persisted identity markers.

use dashmap::DashMap;

/// Key for the signed-in user's id.
pub const USER_ID_KEY: &str = "userId";
/// Key for the session token.
pub const TOKEN_KEY: &str = "token";

/// Small key-value store that outlives a single bootstrap, such as browser
/// local storage or a file under the user's config directory.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Forget who is signed in.
    fn clear_identity(&self) {
        self.remove(USER_ID_KEY);
        self.remove(TOKEN_KEY);
    }
}

/// Credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_identity_leaves_other_keys() {
        let store = MemoryCredentialStore::new();
        store.set(USER_ID_KEY, "u1");
        store.set(TOKEN_KEY, "jwt");
        store.set("theme", "dark");

        store.clear_identity();

        assert_eq!(store.get(USER_ID_KEY), None);
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
