//! Session gate behavior against a scripted auth service: resolution of
//! the loading state, unconditional credential clearing, refresh-and-retry,
//! and logout idempotence.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use portfolio_client::{AuthApi, AuthError, CredentialStore, MemoryStore, SessionGate, SessionState};
use portfolio_types::api::TokenPair;

/// One scripted answer from the fake auth service.
#[derive(Clone)]
enum Answer {
    Ok,
    Rejected,
    Network,
}

impl Answer {
    fn into_result(self) -> Result<(), AuthError> {
        match self {
            Answer::Ok => Ok(()),
            Answer::Rejected => Err(AuthError::Rejected("rejected".into())),
            Answer::Network => Err(AuthError::Network("connection refused".into())),
        }
    }
}

#[derive(Default)]
struct MockAuth {
    verify_script: Mutex<VecDeque<Answer>>,
    refresh_script: Mutex<VecDeque<Answer>>,
    login_answer: Mutex<Option<Answer>>,
    logout_answer: Mutex<Option<Answer>>,
    verify_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl MockAuth {
    fn verify_then(self, answers: &[Answer]) -> Self {
        *self.verify_script.lock().unwrap() = answers.iter().cloned().collect();
        self
    }

    fn refresh_then(self, answers: &[Answer]) -> Self {
        *self.refresh_script.lock().unwrap() = answers.iter().cloned().collect();
        self
    }

    fn login_with(self, answer: Answer) -> Self {
        *self.login_answer.lock().unwrap() = Some(answer);
        self
    }

    fn logout_with(self, answer: Answer) -> Self {
        *self.logout_answer.lock().unwrap() = Some(answer);
        self
    }

    fn next(script: &Mutex<VecDeque<Answer>>) -> Answer {
        script
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock script exhausted")
    }
}

impl AuthApi for &MockAuth {
    async fn verify(&self, _access: &str) -> Result<(), AuthError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        MockAuth::next(&self.verify_script).into_result()
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<TokenPair, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.login_answer.lock().unwrap().clone().expect("no login answer");
        answer.into_result().map(|_| TokenPair {
            access: "issued-access".into(),
            refresh: "issued-refresh".into(),
        })
    }

    async fn refresh(&self, _refresh: &str) -> Result<String, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        MockAuth::next(&self.refresh_script).into_result()?;
        Ok("refreshed-access".into())
    }

    async fn logout(&self, _access: &str) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.logout_answer.lock().unwrap().clone().expect("no logout answer");
        answer.into_result()
    }
}

fn stored_pair() -> TokenPair {
    TokenPair {
        access: "stored-access".into(),
        refresh: "stored-refresh".into(),
    }
}

#[tokio::test]
async fn absent_token_resolves_unauthenticated_without_network() {
    let auth = MockAuth::default();
    let gate = SessionGate::new(MemoryStore::new(), &auth);

    assert_eq!(gate.state(), SessionState::Loading);
    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    assert_eq!(gate.state(), SessionState::Unauthenticated);

    assert_eq!(auth.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_token_resolves_authenticated() {
    let auth = MockAuth::default().verify_then(&[Answer::Ok]);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Authenticated);
    assert_eq!(gate.store().get(), Some(stored_pair()));
}

#[tokio::test]
async fn rejected_token_refreshes_once_and_reauthenticates() {
    let auth = MockAuth::default()
        .verify_then(&[Answer::Rejected, Answer::Ok])
        .refresh_then(&[Answer::Ok]);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Authenticated);

    // The refreshed access token is stored alongside the original refresh.
    let tokens = gate.store().get().unwrap();
    assert_eq!(tokens.access, "refreshed-access");
    assert_eq!(tokens.refresh, "stored-refresh");

    assert_eq!(auth.verify_calls.load(Ordering::SeqCst), 2);
    assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_refresh_clears_credentials() {
    let auth = MockAuth::default()
        .verify_then(&[Answer::Rejected])
        .refresh_then(&[Answer::Rejected]);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
}

#[tokio::test]
async fn rejection_after_refresh_clears_credentials() {
    let auth = MockAuth::default()
        .verify_then(&[Answer::Rejected, Answer::Rejected])
        .refresh_then(&[Answer::Ok]);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
}

#[tokio::test]
async fn network_failure_degrades_to_unauthenticated_and_clears() {
    let auth = MockAuth::default().verify_then(&[Answer::Network]);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
    // Unreachable is not retried through the refresh path.
    assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_success_stores_pair_and_authenticates() {
    let auth = MockAuth::default().login_with(Answer::Ok);
    let gate = SessionGate::new(MemoryStore::new(), &auth);

    gate.check_session().await;
    assert_eq!(gate.state(), SessionState::Unauthenticated);

    gate.login("admin", "hunter2").await.unwrap();
    assert_eq!(gate.state(), SessionState::Authenticated);
    assert_eq!(gate.store().get().unwrap().access, "issued-access");
}

#[tokio::test]
async fn login_failure_leaves_state_and_store_untouched() {
    let auth = MockAuth::default().login_with(Answer::Rejected);
    let gate = SessionGate::new(MemoryStore::new(), &auth);
    gate.check_session().await;

    let err = gate.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(_)));
    assert_eq!(gate.state(), SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
}

#[tokio::test]
async fn logout_clears_even_when_remote_call_fails() {
    let auth = MockAuth::default()
        .verify_then(&[Answer::Ok])
        .logout_with(Answer::Network);
    let store = MemoryStore::new();
    store.set(stored_pair());

    let gate = SessionGate::new(store, &auth);
    assert_eq!(gate.check_session().await, SessionState::Authenticated);

    gate.logout().await;
    assert_eq!(gate.state(), SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let auth = MockAuth::default().logout_with(Answer::Ok);
    let gate = SessionGate::new(MemoryStore::new(), &auth);
    gate.check_session().await;

    gate.logout().await;
    gate.logout().await;
    assert_eq!(gate.state(), SessionState::Unauthenticated);
    assert!(gate.store().get().is_none());
    // No credential, so the remote endpoint is never bothered.
    assert_eq!(auth.logout_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn full_lifecycle_login_then_logout() {
    let auth = MockAuth::default()
        .login_with(Answer::Ok)
        .logout_with(Answer::Ok);
    let gate = SessionGate::new(MemoryStore::new(), &auth);

    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    gate.login("admin", "hunter2").await.unwrap();
    assert_eq!(gate.state(), SessionState::Authenticated);

    gate.logout().await;
    assert_eq!(gate.state(), SessionState::Unauthenticated);
    assert_eq!(auth.logout_calls.load(Ordering::SeqCst), 1);
}
