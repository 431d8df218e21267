//! HTTP implementation of the auth service boundary.
//!
//! Talks JSON to `{base}/auth/login` and `{base}/auth/register`. Successful
//! responses wrap their payload in a `data` envelope; rejections carry a
//! `message` field that is surfaced to the user unchanged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Credentials, RegistrationInfo};

use super::error::AuthOperation;
use super::{AuthError, AuthService, LoginResponse, RegisterResponse};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The store adds no timeout of its own, so this bounds every backend call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth client for the real backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpAuthService {
    client: Client,
    base_url: String,
}

impl HttpAuthService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::ClientSetup(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: AuthOperation,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let url = self.url(path);
        debug!(url = %url, ?operation, "Sending auth request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::from_status(operation, status, &text));
        }

        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.post(AuthOperation::Login, LOGIN_PATH, &body).await
    }

    async fn register(&self, info: &RegistrationInfo) -> Result<RegisterResponse, AuthError> {
        self.post(AuthOperation::Register, REGISTER_PATH, info).await
    }
}
