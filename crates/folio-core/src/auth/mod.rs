//! Authentication module for the portfolio admin session.
//!
//! This module provides:
//! - `SessionManager`: login, logout, silent refresh and periodic renewal
//! - `AuthGateway`: the authentication endpoints the manager calls
//! - `TokenStore`: the persisted access-token slot, with file
//!   (`FileTokenStore`), OS keychain (`KeyringTokenStore`) and in-memory
//!   (`MemoryTokenStore`) backends
//!
//! Access tokens live about 15 minutes; the manager renews them every 14.

pub mod credentials;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod renewal;
pub mod session;
pub mod state;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use gateway::{AuthGateway, LoginGrant};
pub use manager::{SessionConfig, SessionManager, DEFAULT_REFRESH_INTERVAL_SECS};
pub use session::{FileTokenStore, PersistedToken};
pub use state::{SessionPhase, SessionState};
pub use store::{MemoryTokenStore, TokenStore, TOKEN_KEY};
