use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{Account, Credentials, RegistrationInfo, Role};

use super::{AuthError, AuthService, LoginResponse, RegisterResponse};

/// Simulated network delay for the mock backend.
pub const DEFAULT_MOCK_DELAY_MS: u64 = 500;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";
const REGISTRATION_MESSAGE: &str = "Registration successful";

struct FixtureAccount {
    account: Account,
    password: &'static str,
    token: &'static str,
}

fn fixtures() -> [FixtureAccount; 2] {
    [
        FixtureAccount {
            account: Account {
                id: 1,
                name: "John Doe".to_string(),
                email: "user@example.com".to_string(),
                role: Role::User,
            },
            password: "password123",
            token: "mock-user-jwt-token",
        },
        FixtureAccount {
            account: Account {
                id: 101,
                name: "City Works Dept".to_string(),
                email: "agency@example.com".to_string(),
                role: Role::Agency,
            },
            password: "password123",
            token: "mock-agency-jwt-token",
        },
    ]
}

/// In-process stand-in for the backend with two fixed accounts.
///
/// `user@example.com` and `agency@example.com`, both with `password123`.
/// Registration always succeeds.
#[derive(Debug, Clone)]
pub struct MockAuthService {
    delay: Duration,
}

impl MockAuthService {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(DEFAULT_MOCK_DELAY_MS))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for MockAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        debug!(email = %credentials.email, "Mock API: attempting login");
        self.simulate_latency().await;

        fixtures()
            .into_iter()
            .find(|f| f.account.email == credentials.email && f.password == credentials.password)
            .map(|f| LoginResponse {
                user: f.account,
                token: f.token.to_string(),
            })
            .ok_or_else(|| AuthError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.to_string()))
    }

    async fn register(&self, info: &RegistrationInfo) -> Result<RegisterResponse, AuthError> {
        self.simulate_latency().await;
        debug!(email = %info.email, role = %info.role, "Mock API: registering user");

        Ok(RegisterResponse {
            message: REGISTRATION_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_fixture_login() {
        let service = MockAuthService::with_delay(Duration::ZERO);
        let response = service
            .login(&Credentials::new("user@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(response.user.id, 1);
        assert_eq!(response.user.name, "John Doe");
        assert_eq!(response.user.role, Role::User);
        assert_eq!(response.token, "mock-user-jwt-token");
    }

    #[tokio::test]
    async fn test_agency_fixture_login() {
        let service = MockAuthService::with_delay(Duration::ZERO);
        let response = service
            .login(&Credentials::new("agency@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(response.user.id, 101);
        assert_eq!(response.user.role, Role::Agency);
        assert_eq!(response.token, "mock-agency-jwt-token");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let service = MockAuthService::with_delay(Duration::ZERO);
        let err = service
            .login(&Credentials::new("user@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid credentials. Please try again.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let service = MockAuthService::new();
        let started = tokio::time::Instant::now();
        let info = RegistrationInfo {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            password: "p".to_string(),
            role: Role::User,
        };

        let response = service.register(&info).await.unwrap();

        assert_eq!(response.message, "Registration successful");
        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_MOCK_DELAY_MS));
    }
}
