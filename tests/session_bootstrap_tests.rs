// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session bootstrap state machine tests.
//!
//! The identity API is faked so each test controls when `who_am_i`
//! returns. A zero-permit semaphore holds checks in flight until the test
//! releases them.

use gym_tracker::models::UserProfile;
use gym_tracker::session::{
    CredentialStore, IdentityApi, MemoryCredentialStore, Notice, NoticeLevel, Notifier,
    SessionBootstrap, SessionError, SessionState, TOKEN_KEY, USER_ID_KEY,
};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

const USER_ID: &str = "65f0c0ffee0000000000abcd";

fn profile() -> UserProfile {
    UserProfile {
        id: USER_ID.to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        image: None,
        stats: Vec::new(),
        lastlogin: None,
    }
}

// ─── Fakes ───────────────────────────────────────────────────

struct Backend {
    me: Mutex<Result<UserProfile, StatusCode>>,
    sign_out_fails: AtomicBool,
    who_am_i_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl Backend {
    fn new(me: Result<UserProfile, StatusCode>) -> Arc<Self> {
        Arc::new(Self {
            me: Mutex::new(me),
            sign_out_fails: AtomicBool::new(false),
            who_am_i_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    /// Backend whose `who_am_i` waits for a permit from the returned gate.
    fn gated(me: Result<UserProfile, StatusCode>) -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(Self {
            me: Mutex::new(me),
            sign_out_fails: AtomicBool::new(false),
            who_am_i_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            gate: Some(Arc::clone(&gate)),
        });
        (backend, gate)
    }

    fn who_am_i_calls(&self) -> usize {
        self.who_am_i_calls.load(Ordering::SeqCst)
    }
}

struct FakeApi(Arc<Backend>);

impl IdentityApi for FakeApi {
    async fn who_am_i(&self) -> Result<UserProfile, SessionError> {
        self.0.who_am_i_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.0.gate {
            gate.acquire().await.unwrap().forget();
        }
        let me = self.0.me.lock().unwrap().clone();
        me.map_err(|status| SessionError::Status {
            status,
            body: String::new(),
        })
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        self.0.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.sign_out_fails.load(Ordering::SeqCst) {
            return Err(SessionError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

struct Harness {
    bootstrap: SessionBootstrap<FakeApi>,
    backend: Arc<Backend>,
    credentials: Arc<MemoryCredentialStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(backend: Arc<Backend>) -> Harness {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let bootstrap = SessionBootstrap::new(
        FakeApi(Arc::clone(&backend)),
        credentials.clone(),
        notifier.clone(),
    );
    Harness {
        bootstrap,
        backend,
        credentials,
        notifier,
    }
}

/// Give spawned checks a chance to finish.
async fn let_background_run() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ─── Checks ──────────────────────────────────────────────────

#[tokio::test]
async fn test_reads_do_not_block_while_checking() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    h.bootstrap.mount();

    let session = h.bootstrap.snapshot();
    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert!(session.session_check_pending);

    gate.add_permits(1);
    let session = h.bootstrap.settled().await;
    assert!(session.is_authenticated);
    assert_eq!(session.user, Some(profile()));
    assert!(!session.session_check_pending);
    assert_eq!(h.credentials.get(USER_ID_KEY).as_deref(), Some(USER_ID));
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_stale_session_settles_unauthenticated() {
    let h = harness(Backend::new(Err(StatusCode::UNAUTHORIZED)));
    h.credentials.set(USER_ID_KEY, USER_ID);
    h.credentials.set(TOKEN_KEY, "expired.jwt.token");

    let session = h.bootstrap.check().await;

    assert_eq!(
        serde_json::to_value(&session).unwrap(),
        serde_json::json!({
            "isAuthenticated": false,
            "user": null,
            "sessionCheckPending": false
        })
    );
    assert_eq!(h.bootstrap.state(), SessionState::Unauthenticated);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    assert_eq!(h.credentials.get(TOKEN_KEY), None);
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::info("Please sign in to continue.")]
    );
}

#[tokio::test]
async fn test_server_error_also_settles_unauthenticated() {
    let h = harness(Backend::new(Err(StatusCode::INTERNAL_SERVER_ERROR)));
    h.credentials.set(USER_ID_KEY, USER_ID);

    let session = h.bootstrap.check().await;

    assert!(!session.is_authenticated);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_ne!(notices[0].message, "Please sign in to continue.");
}

#[tokio::test]
async fn test_checks_are_coalesced() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    h.bootstrap.mount();
    h.bootstrap.request_recheck();
    let joined = tokio::spawn({
        let bootstrap = h.bootstrap.clone();
        async move { bootstrap.check().await }
    });

    let_background_run().await;
    gate.add_permits(1);

    let session = joined.await.unwrap();
    assert!(session.is_authenticated);
    assert_eq!(h.backend.who_am_i_calls(), 1);
}

#[tokio::test]
async fn test_abandoned_check_still_settles() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    let waited = tokio::time::timeout(Duration::from_millis(20), h.bootstrap.check()).await;
    assert!(waited.is_err());
    assert!(h.bootstrap.snapshot().session_check_pending);

    gate.add_permits(1);
    let session = tokio::time::timeout(Duration::from_millis(500), h.bootstrap.settled())
        .await
        .expect("check settles after its caller gave up");
    assert!(session.is_authenticated);

    h.bootstrap.request_recheck();
    gate.add_permits(1);
    let session = tokio::time::timeout(Duration::from_millis(500), h.bootstrap.settled())
        .await
        .expect("later recheck settles");
    assert!(session.is_authenticated);
    assert!(!session.session_check_pending);
    assert_eq!(h.backend.who_am_i_calls(), 2);
}

#[tokio::test]
async fn test_mount_runs_once() {
    let h = harness(Backend::new(Ok(profile())));

    h.bootstrap.mount();
    h.bootstrap.mount();
    h.bootstrap.settled().await;
    h.bootstrap.mount();
    let_background_run().await;

    assert_eq!(h.backend.who_am_i_calls(), 1);
    assert!(h.bootstrap.is_authenticated());
}

#[tokio::test]
async fn test_recheck_keeps_previous_identity_visible() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    gate.add_permits(1);
    h.bootstrap.check().await;
    assert!(h.bootstrap.is_authenticated());

    h.bootstrap.request_recheck();
    let session = h.bootstrap.snapshot();
    assert!(session.is_authenticated);
    assert!(session.session_check_pending);
    assert_eq!(h.bootstrap.user(), Some(profile()));

    *h.backend.me.lock().unwrap() = Err(StatusCode::UNAUTHORIZED);
    gate.add_permits(1);
    let session = h.bootstrap.settled().await;
    assert!(!session.is_authenticated);
}

#[tokio::test]
async fn test_subscribers_see_settled_state() {
    let h = harness(Backend::new(Ok(profile())));
    let mut rx = h.bootstrap.subscribe();

    h.bootstrap.mount();

    let state = rx
        .wait_for(|state| matches!(state, SessionState::Authenticated(_)))
        .await
        .unwrap()
        .clone();
    assert_eq!(state.user(), Some(&profile()));
}

#[tokio::test]
async fn test_dropped_bootstrap_discards_result() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    h.bootstrap.mount();
    let_background_run().await;
    drop(h.bootstrap);

    gate.add_permits(1);
    let_background_run().await;

    assert_eq!(h.backend.who_am_i_calls(), 1);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    assert!(h.notifier.notices().is_empty());
}

// ─── Logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_clears_state_and_says_goodbye() {
    let h = harness(Backend::new(Ok(profile())));
    h.bootstrap.check().await;
    h.credentials.set(TOKEN_KEY, "jwt");

    let session = h.bootstrap.logout().await;

    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert!(!session.session_check_pending);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    assert_eq!(h.credentials.get(TOKEN_KEY), None);
    assert_eq!(h.backend.sign_out_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::success("Hope to see you soon.")]
    );
}

#[tokio::test]
async fn test_logout_clears_state_when_server_fails() {
    let h = harness(Backend::new(Ok(profile())));
    h.bootstrap.check().await;
    h.backend.sign_out_fails.store(true, Ordering::SeqCst);

    let session = h.bootstrap.logout().await;

    assert!(!session.is_authenticated);
    assert_eq!(h.bootstrap.state(), SessionState::Unauthenticated);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_logout_during_check_discards_late_result() {
    let (backend, gate) = Backend::gated(Ok(profile()));
    let h = harness(backend);

    h.bootstrap.mount();
    let_background_run().await;
    assert_eq!(h.backend.who_am_i_calls(), 1);

    h.bootstrap.logout().await;
    gate.add_permits(1);
    let_background_run().await;

    assert_eq!(h.bootstrap.state(), SessionState::Unauthenticated);
    assert_eq!(h.credentials.get(USER_ID_KEY), None);
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::success("Hope to see you soon.")]
    );
}

#[tokio::test]
async fn test_check_after_logout_runs_again() {
    let h = harness(Backend::new(Ok(profile())));
    h.bootstrap.check().await;
    h.bootstrap.logout().await;

    let session = h.bootstrap.check().await;

    assert!(session.is_authenticated);
    assert_eq!(h.backend.who_am_i_calls(), 2);
}
