use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Permission level of an admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Superadmin,
}

impl AdminRole {
    /// Get the display name for this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            AdminRole::Admin => "Admin",
            AdminRole::Superadmin => "Super Admin",
        }
    }
}

/// Administrator profile as returned by the login and profile endpoints.
///
/// The backend stores admins in a document database, so the identifier
/// may arrive as `_id` rather than `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Admin {
    pub fn is_superadmin(&self) -> bool {
        self.role == AdminRole::Superadmin
    }
}
