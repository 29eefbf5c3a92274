//! Session manager - login, logout, silent refresh and periodic renewal.
//!
//! `SessionManager` is a cheap `Clone` handle; every clone drives the same
//! session. State changes are published as `SessionState` snapshots on a
//! `tokio::sync::watch` channel.
//!
//! Every login, refresh and logout takes a new generation number when it
//! starts. A network response is only applied if its generation is still
//! the current one, so a refresh that completes after a logout (or a login
//! that completes after a newer login) is discarded instead of resurrecting
//! a superseded session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::models::Admin;

use super::error::AuthError;
use super::gateway::AuthGateway;
use super::renewal::RenewalTimer;
use super::state::{SessionPhase, SessionState};
use super::store::TokenStore;

/// Renewal period. Access tokens live ~15 minutes; renewing at 14 leaves
/// a minute of slack for the round trip.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 14 * 60;

const MISSING_CREDENTIALS: &str = "Email and password are required";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub refresh_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        }
    }
}

struct Inner {
    generation: u64,
    access_token: Option<String>,
    renewal: RenewalTimer,
}

struct Shared {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn TokenStore>,
    config: SessionConfig,
    inner: Mutex<Inner>,
    state: watch::Sender<SessionState>,
}

/// Single source of truth for admin authentication.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    /// Create a manager in the `Initializing` phase. Call `initialize` to
    /// restore a persisted session.
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: Arc<dyn TokenStore>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());
        Self {
            shared: Arc::new(Shared {
                gateway,
                store,
                config,
                inner: Mutex::new(Inner {
                    generation: 0,
                    access_token: None,
                    renewal: RenewalTimer::new(),
                }),
                state,
            }),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// Receive every subsequent state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.state.borrow().is_authenticated()
    }

    /// In-memory access token for signing requests
    pub fn access_token(&self) -> Option<String> {
        self.lock_inner().access_token.clone()
    }

    /// Whether the background renewal task is currently running
    pub fn renewal_armed(&self) -> bool {
        self.lock_inner().renewal.is_armed()
    }

    pub fn clear_error(&self) {
        self.shared.state.send_modify(|s| s.error = None);
    }

    // =========================================================================
    // Lifecycle operations
    // =========================================================================

    /// Restore the session from the persisted token, if there is one.
    ///
    /// Never fails: an unreadable store or a rejected refresh both end in
    /// `Unauthenticated` with no error surfaced.
    pub async fn initialize(&self) -> SessionState {
        let persisted = match self.shared.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, starting signed out");
                None
            }
        };

        match persisted {
            Some(token) => {
                info!(token_len = token.len(), "Found persisted access token, renewing session");
                self.lock_inner().access_token = Some(token);
                if let Err(e) = self.refresh_token().await {
                    info!(error = %e, "Persisted session could not be renewed");
                }
            }
            None => {
                info!("No persisted session found");
                let _inner = self.lock_inner();
                if self.phase() == SessionPhase::Initializing {
                    self.shared.state.send_modify(|s| s.unauthenticated(None));
                }
            }
        }

        self.state()
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            warn!("Login rejected locally: missing credentials");
            self.shared
                .state
                .send_modify(|s| s.error = Some(MISSING_CREDENTIALS.to_string()));
            return Err(AuthError::Validation(MISSING_CREDENTIALS.to_string()));
        }

        info!(email = %email, "Signing in");
        let generation = self.begin(SessionPhase::Authenticating, true);

        match self.shared.gateway.login(email, password).await {
            Ok(grant) => {
                let mut inner = self.lock_inner();
                if inner.generation != generation {
                    debug!(generation, "Login completed after a newer session change, discarding");
                    return Err(AuthError::Superseded);
                }
                self.store_token(&mut inner, grant.access_token);
                self.enter_authenticated(&mut inner, grant.admin.clone());
                info!(admin_id = %grant.admin.id, role = ?grant.admin.role, "Sign in successful");
                Ok(grant.admin)
            }
            Err(e) => {
                let err = AuthError::from_login(e);
                error!(error = %err, "Sign in failed");
                let mut inner = self.lock_inner();
                if inner.generation == generation {
                    self.enter_unauthenticated(&mut inner, Some(err.to_string()));
                }
                Err(err)
            }
        }
    }

    /// Exchange the refresh cookie for a new access token and re-fetch the
    /// admin profile.
    ///
    /// Any failure signs the session out (silently: `error` stays unset)
    /// and is returned to the caller. Nothing is retried.
    pub async fn refresh_token(&self) -> Result<Admin, AuthError> {
        let generation = self.begin(SessionPhase::Refreshing, true);
        debug!(generation, "Refreshing access token");

        let token = match self.shared.gateway.refresh().await {
            Ok(token) => token,
            Err(e) => {
                let err = AuthError::from_refresh(e);
                return Err(self.fail_refresh(generation, err));
            }
        };

        {
            let mut inner = self.lock_inner();
            if inner.generation != generation {
                debug!(generation, "Refresh completed after a newer session change, discarding");
                return Err(AuthError::Superseded);
            }
            self.store_token(&mut inner, token.clone());
        }

        match self.shared.gateway.profile(&token).await {
            Ok(admin) => {
                let mut inner = self.lock_inner();
                if inner.generation != generation {
                    debug!(generation, "Profile fetched after a newer session change, discarding");
                    return Err(AuthError::Superseded);
                }
                self.enter_authenticated(&mut inner, admin.clone());
                info!(admin_id = %admin.id, "Session refreshed");
                Ok(admin)
            }
            Err(e) => {
                let err = AuthError::from_refresh(e);
                Err(self.fail_refresh(generation, err))
            }
        }
    }

    /// Sign out. The server is told on a best-effort basis; local state is
    /// always cleared.
    pub async fn logout(&self) {
        let (generation, token) = {
            let mut inner = self.lock_inner();
            inner.generation += 1;
            inner.renewal.disarm();

            let token = inner.access_token.take();
            if token.is_none() && self.phase() == SessionPhase::Unauthenticated {
                debug!("Logout requested while already signed out");
                self.clear_persisted();
                return;
            }

            info!("Signing out");
            self.clear_persisted();
            self.shared
                .state
                .send_modify(|s| s.begin(SessionPhase::LoggingOut, false));
            (inner.generation, token)
        };

        if let Some(token) = token {
            if let Err(e) = self.shared.gateway.logout(&token).await {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }

        let mut inner = self.lock_inner();
        if inner.generation != generation {
            debug!(generation, "Logout finished after a newer session change");
            return;
        }
        self.enter_unauthenticated(&mut inner, None);
        info!("Signed out");
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn phase(&self) -> SessionPhase {
        self.shared.state.borrow().phase
    }

    /// Start a new operation and return its generation.
    fn begin(&self, phase: SessionPhase, loading: bool) -> u64 {
        let mut inner = self.lock_inner();
        inner.generation += 1;
        // The renewal task itself drives refreshes, so it keeps running
        // through `Refreshing`.
        if phase != SessionPhase::Refreshing {
            inner.renewal.disarm();
        }
        self.shared.state.send_modify(|s| s.begin(phase, loading));
        inner.generation
    }

    /// Memory first, then the persisted slot.
    fn store_token(&self, inner: &mut Inner, token: String) {
        let token = inner.access_token.insert(token);
        if let Err(e) = self.shared.store.save(token) {
            warn!(error = %e, "Failed to persist access token");
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.shared.store.clear() {
            warn!(error = %e, "Failed to clear persisted access token");
        }
    }

    fn enter_authenticated(&self, inner: &mut Inner, admin: Admin) {
        self.shared.state.send_modify(|s| s.authenticated(admin));

        let weak = Arc::downgrade(&self.shared);
        inner.renewal.arm(self.shared.config.refresh_interval, move || {
            let shared = weak.upgrade()?;
            Some(async move {
                let manager = SessionManager { shared };
                if let Err(e) = manager.refresh_token().await {
                    info!(error = %e, "Scheduled session renewal failed");
                }
            })
        });
    }

    fn enter_unauthenticated(&self, inner: &mut Inner, error: Option<String>) {
        inner.access_token = None;
        self.clear_persisted();
        inner.renewal.disarm();
        self.shared.state.send_modify(|s| s.unauthenticated(error));
    }

    fn fail_refresh(&self, generation: u64, err: AuthError) -> AuthError {
        let mut inner = self.lock_inner();
        if inner.generation != generation {
            debug!(generation, error = %err, "Stale refresh failure ignored");
            return err;
        }
        warn!(error = %err, "Session refresh failed, signing out");
        self.enter_unauthenticated(&mut inner, None);
        err
    }
}
