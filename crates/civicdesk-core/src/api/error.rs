use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    RegistrationFailed(String),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to save session: {0}")]
    Storage(String),

    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(String),
}

/// The tag of an `AuthError`, for callers that branch on failure shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    RegistrationFailed,
    MissingCredentials,
    Network,
    InvalidResponse,
    Storage,
    ClientSetup,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "invalid_credentials",
            AuthErrorKind::RegistrationFailed => "registration_failed",
            AuthErrorKind::MissingCredentials => "missing_credentials",
            AuthErrorKind::Network => "network",
            AuthErrorKind::InvalidResponse => "invalid_response",
            AuthErrorKind::Storage => "storage",
            AuthErrorKind::ClientSetup => "client_setup",
        }
    }
}

/// Which call produced a rejection, so the status maps to the right kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Login,
    Register,
}

/// Error payload the backend sends alongside a non-success status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials(_) => AuthErrorKind::InvalidCredentials,
            AuthError::RegistrationFailed(_) => AuthErrorKind::RegistrationFailed,
            AuthError::MissingCredentials => AuthErrorKind::MissingCredentials,
            AuthError::Network(_) => AuthErrorKind::Network,
            AuthError::InvalidResponse(_) => AuthErrorKind::InvalidResponse,
            AuthError::Storage(_) => AuthErrorKind::Storage,
            AuthError::ClientSetup(_) => AuthErrorKind::ClientSetup,
        }
    }

    /// User-facing message. For backend rejections this is exactly the
    /// `message` the backend sent.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(operation: AuthOperation, status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body).map(|b| b.message).ok();

        match (operation, status.as_u16()) {
            (AuthOperation::Login, 400 | 401 | 403 | 404 | 422) => AuthError::InvalidCredentials(
                message.unwrap_or_else(|| "Invalid credentials. Please try again.".to_string()),
            ),
            (AuthOperation::Register, 400..=499) => AuthError::RegistrationFailed(
                message.unwrap_or_else(|| "Registration failed. Please try again.".to_string()),
            ),
            _ => AuthError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                message.unwrap_or_else(|| Self::truncate_body(body))
            )),
        }
    }
}
