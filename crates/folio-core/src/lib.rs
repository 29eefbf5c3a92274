//! Core library for folio, the portfolio site's admin session client.
//!
//! The pieces fit together like this:
//!
//! - [`api::ApiClient`] talks to the backend and keeps the refresh cookie
//! - [`auth::SessionManager`] owns the session state machine on top of it
//! - [`auth::TokenStore`] backends persist the access token across restarts
//! - [`config::Config`] picks the backend URL and storage backend

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthError, AuthGateway, SessionConfig, SessionManager, SessionPhase, SessionState, TokenStore,
};
pub use config::{Config, TokenStoreKind};
pub use models::{Admin, AdminRole};
