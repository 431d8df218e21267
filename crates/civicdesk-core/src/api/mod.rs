//! Authentication service boundary.
//!
//! This module provides the `AuthService` trait the session store talks to,
//! plus two implementations:
//! - `HttpAuthService`: JSON over HTTP against the real backend
//! - `MockAuthService`: fixed fixture accounts with simulated latency

pub mod client;
pub mod error;
pub mod mock;
pub mod service;

pub use client::HttpAuthService;
pub use error::{AuthError, AuthErrorKind};
pub use mock::MockAuthService;
pub use service::{AuthService, LoginResponse, RegisterResponse};
