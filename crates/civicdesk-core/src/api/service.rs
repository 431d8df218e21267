use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Account, Credentials, RegistrationInfo};

use super::AuthError;

/// A freshly issued account and its opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: Account,
    pub token: String,
}

/// Confirmation that the backend accepted a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Backend boundary for credential verification and account registration.
///
/// Both calls may suspend for as long as the backend takes. What counts as a
/// match or an acceptable registration is backend policy.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    async fn register(&self, info: &RegistrationInfo) -> Result<RegisterResponse, AuthError>;
}
