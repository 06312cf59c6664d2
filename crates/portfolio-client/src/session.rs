use portfolio_types::api::TokenPair;
use tracing::{debug, warn};

use crate::store::CredentialStore;

/// Where the gate stands. `Loading` exists only between construction and
/// the first `check_session` resolution, so the authenticated branch never
/// renders before verification completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Everything that can move the gate between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    VerifiedOk,
    VerifyFailed,
    LoggedIn,
    LoggedOut,
}

/// The single transition function for the gate, independent of any async
/// plumbing. Transitions the contract does not list are no-ops, never
/// panics:
///
/// - `Loading` resolves exactly once, to either terminal state.
/// - `Authenticated -> Unauthenticated` on logout or failed re-verification.
/// - `Unauthenticated -> Authenticated` only through login.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    use SessionEvent::*;
    use SessionState::*;

    match (state, event) {
        (_, LoggedOut) => Unauthenticated,
        (_, VerifyFailed) => Unauthenticated,
        (_, LoggedIn) => Authenticated,
        (Loading | Authenticated, VerifiedOk) => Authenticated,
        // A verify success cannot promote an already-resolved
        // Unauthenticated session; only login can.
        (Unauthenticated, VerifiedOk) => Unauthenticated,
    }
}

/// Errors surfaced by the auth service seam. These stop at the gate:
/// `check_session` and `logout` consume them internally, and `login`
/// returns them as a plain failure for the form to display.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service answered and said no (bad credentials, expired token).
    #[error("{0}")]
    Rejected(String),
    /// The service could not be reached or answered garbage.
    #[error("network error: {0}")]
    Network(String),
}

/// Remote auth service contract. Implemented over HTTP by
/// [`crate::HttpAuthApi`]; tests substitute a scripted mock.
pub trait AuthApi: Send + Sync {
    fn verify(&self, access: &str) -> impl Future<Output = Result<(), AuthError>> + Send;
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<TokenPair, AuthError>> + Send;
    fn refresh(&self, refresh: &str) -> impl Future<Output = Result<String, AuthError>> + Send;
    fn logout(&self, access: &str) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Decides whether the viewer is authenticated before an admin surface
/// renders. Holds the single source-of-truth state value; every mutation
/// goes through [`transition`].
pub struct SessionGate<S, A> {
    store: S,
    api: A,
    state: std::sync::Mutex<SessionState>,
}

impl<S: CredentialStore, A: AuthApi> SessionGate<S, A> {
    pub fn new(store: S, api: A) -> Self {
        Self {
            store,
            api,
            state: std::sync::Mutex::new(SessionState::Loading),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("gate state lock poisoned")
    }

    /// The underlying credential store. Authenticated surfaces read the
    /// access token from here for their own API calls.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply(&self, event: SessionEvent) -> SessionState {
        let mut state = self.state.lock().expect("gate state lock poisoned");
        *state = transition(*state, event);
        *state
    }

    /// Resolve the session once per load. Absent credential: resolves to
    /// Unauthenticated without touching the network. Present credential:
    /// one verify round-trip, with a single refresh-and-retry on explicit
    /// rejection. Any failure clears the store: a credential that did not
    /// verify must not survive to look valid later. Never returns an error.
    pub async fn check_session(&self) -> SessionState {
        let Some(tokens) = self.store.get() else {
            return self.apply(SessionEvent::VerifyFailed);
        };

        match self.api.verify(&tokens.access).await {
            Ok(()) => self.apply(SessionEvent::VerifiedOk),
            Err(AuthError::Rejected(reason)) => {
                debug!("Access token rejected ({}), attempting refresh", reason);
                self.refresh_and_retry(tokens).await
            }
            Err(AuthError::Network(e)) => {
                warn!("Verification unreachable, treating as unauthenticated: {}", e);
                self.store.clear();
                self.apply(SessionEvent::VerifyFailed)
            }
        }
    }

    async fn refresh_and_retry(&self, tokens: TokenPair) -> SessionState {
        let access = match self.api.refresh(&tokens.refresh).await {
            Ok(access) => access,
            Err(e) => {
                debug!("Refresh failed: {}", e);
                self.store.clear();
                return self.apply(SessionEvent::VerifyFailed);
            }
        };

        match self.api.verify(&access).await {
            Ok(()) => {
                self.store.set(TokenPair {
                    access,
                    refresh: tokens.refresh,
                });
                self.apply(SessionEvent::VerifiedOk)
            }
            Err(e) => {
                debug!("Refreshed token still rejected: {}", e);
                self.store.clear();
                self.apply(SessionEvent::VerifyFailed)
            }
        }
    }

    /// Delegate to the auth service; on success the returned pair is
    /// stored and the gate becomes Authenticated. On failure the state and
    /// store are left untouched so the login form can simply show the
    /// error and retry.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let tokens = self.api.login(username, password).await?;
        self.store.set(tokens);
        self.apply(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Best-effort remote logout. Whatever the remote call does, local
    /// credentials are cleared and the gate ends Unauthenticated.
    /// Idempotent: a second call finds no credential and still lands in
    /// the same place.
    pub async fn logout(&self) {
        if let Some(tokens) = self.store.get() {
            if let Err(e) = self.api.logout(&tokens.access).await {
                warn!("Remote logout failed, clearing local credentials anyway: {}", e);
            }
        }
        self.store.clear();
        self.apply(SessionEvent::LoggedOut);
    }
}
