//! REST API gateway for the portfolio backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! portfolio REST API. Every request carries the in-process cookie jar
//! (which holds the httpOnly refresh cookie) and, when a token is held,
//! an `Authorization: Bearer` header. Non-2xx responses are normalized
//! into `ApiError`.

pub mod client;
pub mod cookies;
pub mod error;

pub use client::ApiClient;
pub use cookies::CookieJar;
pub use error::{ApiError, ErrorReply};
