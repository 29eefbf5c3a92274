//! Data models returned by the portfolio admin API.
//!
//! - `Admin`: the authenticated administrator profile
//! - `AdminRole`: permission level of an admin account

pub mod admin;

pub use admin::{Admin, AdminRole};
