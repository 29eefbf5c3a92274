use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::Admin;

/// Token and profile issued by a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub access_token: String,
    pub admin: Admin,
}

/// The authentication endpoints the session manager depends on.
///
/// `ApiClient` is the production implementation; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /api/admin/login`
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError>;

    /// `POST /api/admin/refresh`, authenticated by the refresh cookie.
    /// Returns the newly issued access token.
    async fn refresh(&self) -> Result<String, ApiError>;

    /// `GET /api/admin/profile`
    async fn profile(&self, access_token: &str) -> Result<Admin, ApiError>;

    /// `POST /api/admin/logout`
    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;
}
