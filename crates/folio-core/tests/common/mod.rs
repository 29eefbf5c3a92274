//! Shared test fixtures: an in-memory authentication gateway with call
//! counters and switchable outcomes.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use folio_core::api::{ApiError, ErrorReply};
use folio_core::auth::{AuthGateway, LoginGrant, MemoryTokenStore, SessionConfig, SessionManager};
use folio_core::models::{Admin, AdminRole};

pub const EMAIL: &str = "jane@example.com";
pub const PASSWORD: &str = "correct horse";
pub const INVALID_LOGIN: &str = "Invalid email or password";

/// Default renewal period used by the fixtures (14 minutes)
pub const INTERVAL: Duration = Duration::from_secs(14 * 60);

pub fn admin() -> Admin {
    Admin {
        id: "65f0c2a1b4d3e2f1a0987654".to_string(),
        name: "Jane Doe".to_string(),
        email: EMAIL.to_string(),
        role: AdminRole::Admin,
        is_active: true,
        last_login: None,
        created_at: None,
        updated_at: None,
    }
}

#[derive(Default)]
pub struct MockGateway {
    login_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    issued: AtomicUsize,

    fail_refresh: AtomicBool,
    fail_profile: AtomicBool,
    fail_logout: AtomicBool,

    login_gate: Mutex<Option<Arc<Notify>>>,
    refresh_gate: Mutex<Option<Arc<Notify>>>,

    profile_tokens: Mutex<Vec<String>>,
    logout_tokens: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls() + self.refresh_calls() + self.profile_calls() + self.logout_calls()
    }

    pub fn set_fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_profile(&self, fail: bool) {
        self.fail_profile.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    /// Make the next login calls wait until `release_login`
    pub fn hold_login(&self) {
        *self.login_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_login(&self) {
        if let Some(gate) = self.login_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    /// Make the next refresh calls wait until `release_refresh`
    pub fn hold_refresh(&self) {
        *self.refresh_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_refresh(&self) {
        if let Some(gate) = self.refresh_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    pub fn profile_tokens(&self) -> Vec<String> {
        self.profile_tokens.lock().unwrap().clone()
    }

    pub fn logout_tokens(&self) -> Vec<String> {
        self.logout_tokens.lock().unwrap().clone()
    }

    fn issue(&self, prefix: &str) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.login_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if email == EMAIL && password == PASSWORD {
            Ok(LoginGrant {
                access_token: self.issue("access"),
                admin: admin(),
            })
        } else {
            Err(ApiError::Unauthorized(ErrorReply::with_message(INVALID_LOGIN)))
        }
    }

    async fn refresh(&self) -> Result<String, ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.refresh_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_refresh.load(Ordering::SeqCst) {
            Err(ApiError::Unauthorized(ErrorReply::with_message("Refresh token expired")))
        } else {
            Ok(self.issue("refreshed"))
        }
    }

    async fn profile(&self, access_token: &str) -> Result<Admin, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile_tokens.lock().unwrap().push(access_token.to_string());

        if self.fail_profile.load(Ordering::SeqCst) {
            Err(ApiError::Unauthorized(ErrorReply::with_message("Invalid access token")))
        } else {
            Ok(admin())
        }
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_tokens.lock().unwrap().push(access_token.to_string());

        if self.fail_logout.load(Ordering::SeqCst) {
            Err(ApiError::ServerError(ErrorReply::with_message("logout unavailable")))
        } else {
            Ok(())
        }
    }
}

pub fn manager(gateway: &Arc<MockGateway>, store: &MemoryTokenStore) -> SessionManager {
    SessionManager::new(
        gateway.clone(),
        Arc::new(store.clone()),
        SessionConfig {
            refresh_interval: INTERVAL,
        },
    )
}

/// Let spawned tasks run until `done` holds (bounded)
pub async fn settle<F: Fn() -> bool>(done: F) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
}
