//! API client for communicating with the portfolio REST API.
//!
//! This module provides the `ApiClient` struct: a generic request function
//! plus the admin authentication endpoints consumed by the session manager.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::{AuthGateway, LoginGrant};
use crate::models::Admin;

use super::{ApiError, CookieJar};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/api/admin/login";
const REFRESH_PATH: &str = "/api/admin/refresh";
const PROFILE_PATH: &str = "/api/admin/profile";
const LOGOUT_PATH: &str = "/api/admin/logout";

/// Every successful backend response wraps its payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    access_token: String,
    admin: Admin,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshData {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    admin: Admin,
}

/// API client for the portfolio backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and clones share the same cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    cookies: Arc<CookieJar>,
}

impl ApiClient {
    /// Create a new API client for the given backend base URL.
    /// Cookies are kept in memory for the life of the client.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_cookie_jar(base_url, Arc::new(CookieJar::in_memory()))
    }

    /// Create a client backed by an existing (possibly persistent) cookie jar
    pub fn with_cookie_jar(base_url: &str, cookies: Arc<CookieJar>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_provider(cookies.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies,
        })
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn headers(token: Option<&str>) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidResponse("Access token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and return the successful response.
    ///
    /// Cookies from the shared jar are always sent; the bearer token is
    /// attached when `token` is `Some`.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(%method, url = %url, bearer = token.is_some(), "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(Self::headers(token)?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::check_response(response).await
    }

    /// Send a request and parse the JSON response body.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, token, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    /// Send a request and unwrap the `{"data": ...}` envelope.
    async fn request_data<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<T> = self.request(method, path, token, body).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let body = LoginRequest { email, password };
        let data: LoginData = self
            .request_data(Method::POST, LOGIN_PATH, None, Some(&body))
            .await?;

        Ok(LoginGrant {
            access_token: data.access_token,
            admin: data.admin,
        })
    }

    async fn refresh(&self) -> Result<String, ApiError> {
        let data: RefreshData = self
            .request_data(Method::POST, REFRESH_PATH, None, None::<&()>)
            .await?;
        Ok(data.access_token)
    }

    async fn profile(&self, access_token: &str) -> Result<Admin, ApiError> {
        let data: ProfileData = self
            .request_data(Method::GET, PROFILE_PATH, Some(access_token), None::<&()>)
            .await?;
        Ok(data.admin)
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        self.send(Method::POST, LOGOUT_PATH, Some(access_token), None::<&()>)
            .await?;
        Ok(())
    }
}
