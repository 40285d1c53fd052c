// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::models::UserProfile;
use serde::Serialize;

/// Where the identity check stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing checked yet.
    Unchecked,
    /// A check is in flight. `previous` is what readers keep seeing until it
    /// settles.
    Checking { previous: Option<UserProfile> },
    Authenticated(UserProfile),
    Unauthenticated,
}

impl SessionState {
    /// The user readers should see right now.
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Checking { previous } => previous.as_ref(),
            SessionState::Unchecked | SessionState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// True until the first check settles, and again during rechecks.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionState::Unchecked | SessionState::Checking { .. }
        )
    }

    pub fn session(&self) -> Session {
        Session {
            is_authenticated: self.is_authenticated(),
            user: self.user().cloned(),
            session_check_pending: self.is_pending(),
        }
    }
}

/// Read view handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub session_check_pending: bool,
}
