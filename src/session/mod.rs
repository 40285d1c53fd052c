// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session bootstrap.
//!
//! Works out once per application start whether the user is signed in, and
//! shares the answer with every part of the client through a cloned
//! [`SessionBootstrap`] handle. The handle is created at startup and passed
//! to consumers explicitly, so there is no way to reach session state
//! without one.
//!
//! State flows `Unchecked -> Checking -> Authenticated | Unauthenticated`.
//! Reads never block: while a check is in flight readers see the identity
//! from before the check. Any failed check, whatever the cause, settles to
//! `Unauthenticated` and clears the persisted identity markers. Logout always
//! clears local state, even when the server cannot be reached.

pub mod api;
pub mod credentials;
pub mod notify;
pub mod state;

pub use api::{HttpIdentityApi, IdentityApi, SessionClientConfig, SessionError};
pub use credentials::{CredentialStore, MemoryCredentialStore, TOKEN_KEY, USER_ID_KEY};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use state::{Session, SessionState};

use crate::models::UserProfile;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

const LOGOUT_MESSAGE: &str = "Hope to see you soon.";
const LOGOUT_FAILED_MESSAGE: &str =
    "Could not reach the server to sign out. You are signed out on this device.";

/// Shared handle to the session state. Clones share one state.
pub struct SessionBootstrap<A: IdentityApi> {
    inner: Arc<Inner<A>>,
}

impl<A: IdentityApi> Clone for SessionBootstrap<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A> {
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SessionState>,
    /// Bumped by logout; checks started under an older epoch are discarded.
    epoch: AtomicU64,
    mounted: AtomicBool,
}

impl<A: IdentityApi> SessionBootstrap<A> {
    pub fn new(
        api: A,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Unchecked);
        Self {
            inner: Arc::new(Inner {
                api: Arc::new(api),
                credentials,
                notifier,
                state,
                epoch: AtomicU64::new(0),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().session()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user().cloned()
    }

    /// Watch state changes, e.g. to re-render when a check settles.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until no check is pending. Never returns while `Unchecked`, so
    /// call after [`mount`](Self::mount).
    pub async fn settled(&self) -> Session {
        let mut rx = self.inner.state.subscribe();
        let settled = rx
            .wait_for(|state| !state.is_pending())
            .await
            .map(|state| state.session());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    // ─── Checks ──────────────────────────────────────────────────

    /// Start the first identity check in the background. Later calls do
    /// nothing. Must be called from within a tokio runtime.
    pub fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.request_recheck();
    }

    /// Start a background identity check, for instance after signing in.
    /// Joins the in-flight check if there is one. The result is dropped if
    /// every handle is gone by the time it arrives.
    pub fn request_recheck(&self) {
        let Some(epoch) = self.inner.begin_check() else {
            tracing::debug!("Session check already in flight");
            return;
        };

        let api = Arc::clone(&self.inner.api);
        let inner: Weak<Inner<A>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let result = api.who_am_i().await;
            match inner.upgrade() {
                Some(inner) => inner.settle(epoch, result),
                None => tracing::debug!("Session bootstrap dropped before check settled"),
            }
        });
    }

    /// Run an identity check and wait for the settled session. Joins the
    /// in-flight check if there is one. Never fails: errors settle to
    /// unauthenticated.
    ///
    /// The check itself runs on a spawned task, so dropping this future
    /// only stops the wait. The state still settles.
    pub async fn check(&self) -> Session {
        self.request_recheck();
        self.settled().await
    }

    // ─── Logout ──────────────────────────────────────────────────

    /// Sign out on the server if possible, then clear local state regardless.
    pub async fn logout(&self) -> Session {
        let result = self.inner.api.sign_out().await;
        self.inner.clear_local();

        match result {
            Ok(()) => {
                tracing::info!("Signed out");
                self.inner.notifier.notify(Notice::success(LOGOUT_MESSAGE));
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Server sign-out failed");
                self.inner
                    .notifier
                    .notify(Notice::error(LOGOUT_FAILED_MESSAGE));
            }
        }

        self.snapshot()
    }
}

impl<A: IdentityApi> Inner<A> {
    /// Move to `Checking`, keeping the current identity visible. Returns the
    /// epoch the check runs under, or `None` if a check is already running.
    fn begin_check(&self) -> Option<u64> {
        let mut started = None;
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::Checking { .. }) {
                return false;
            }
            let previous = state.user().cloned();
            *state = SessionState::Checking { previous };
            started = Some(self.epoch.load(Ordering::SeqCst));
            true
        });
        started
    }

    fn settle(&self, epoch: u64, result: Result<UserProfile, SessionError>) {
        let failure = result.as_ref().err().map(|e| (e.kind(), e.to_string()));

        let applied = self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            // Identity markers change under the same lock as the state, so
            // a concurrent logout cannot interleave with them.
            *state = match result {
                Ok(user) => {
                    self.credentials.set(USER_ID_KEY, &user.id);
                    SessionState::Authenticated(user)
                }
                Err(_) => {
                    self.credentials.clear_identity();
                    SessionState::Unauthenticated
                }
            };
            true
        });

        if !applied {
            tracing::debug!("Discarding session check that finished after logout");
            return;
        }

        match failure {
            None => tracing::debug!("Session check settled: authenticated"),
            Some((kind, error)) => {
                tracing::info!(kind, error = %error, "Session check settled: unauthenticated");
                let message = if kind == "unauthenticated" {
                    "Please sign in to continue."
                } else {
                    "Could not confirm your session. Please sign in again."
                };
                self.notifier.notify(Notice::info(message));
            }
        }
    }

    fn clear_local(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.credentials.clear_identity();
            *state = SessionState::Unauthenticated;
        });
    }
}
