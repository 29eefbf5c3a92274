use serde::Serialize;

use crate::models::Admin;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SessionPhase {
    /// Created, persisted token not yet checked
    Initializing,
    Unauthenticated,
    /// Login request in flight
    Authenticating,
    Authenticated,
    /// Refresh request (or the profile re-fetch that follows it) in flight
    Refreshing,
    /// Logout request in flight
    LoggingOut,
}

impl SessionPhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionPhase::Initializing => "Initializing",
            SessionPhase::Unauthenticated => "Signed out",
            SessionPhase::Authenticating => "Signing in",
            SessionPhase::Authenticated => "Signed in",
            SessionPhase::Refreshing => "Refreshing",
            SessionPhase::LoggingOut => "Signing out",
        }
    }
}

/// Snapshot of the session published to subscribers.
///
/// The access token is deliberately absent; it is only reachable through
/// `SessionManager::access_token`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: SessionPhase,
    pub admin: Option<Admin>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Fresh state at application start
    pub fn initializing() -> Self {
        Self {
            phase: SessionPhase::Initializing,
            admin: None,
            loading: true,
            error: None,
        }
    }

    /// True iff an admin profile is loaded
    pub fn is_authenticated(&self) -> bool {
        self.admin.is_some()
    }

    pub(crate) fn begin(&mut self, phase: SessionPhase, loading: bool) {
        self.phase = phase;
        self.loading = loading;
    }

    pub(crate) fn authenticated(&mut self, admin: Admin) {
        self.phase = SessionPhase::Authenticated;
        self.admin = Some(admin);
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn unauthenticated(&mut self, error: Option<String>) {
        self.phase = SessionPhase::Unauthenticated;
        self.admin = None;
        self.loading = false;
        self.error = error;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initializing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminRole;

    fn admin() -> Admin {
        Admin {
            id: "a1".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role: AdminRole::Admin,
            is_active: true,
            last_login: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert_eq!(state.phase, SessionPhase::Initializing);
        assert!(state.loading);
        assert!(!state.is_authenticated());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_authenticated_clears_error() {
        let mut state = SessionState::initializing();
        state.error = Some("Login failed".to_string());
        state.authenticated(admin());
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_unauthenticated_drops_admin() {
        let mut state = SessionState::initializing();
        state.authenticated(admin());
        state.unauthenticated(Some("bad".to_string()));
        assert_eq!(state.phase, SessionPhase::Unauthenticated);
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some("bad"));
    }
}
