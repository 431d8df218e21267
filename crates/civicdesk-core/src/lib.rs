//! Core library for civicdesk.
//!
//! Manages the signed-in session of a citizen or agency account: verifies
//! credentials against the backend, persists the session so it survives a
//! restart, and tells the front-end where to navigate afterwards.
//!
//! - `session`: the `SessionStore` and its invariants
//! - `api`: the auth service boundary (HTTP and mock backends)
//! - `storage`: durable key-value persistence
//! - `navigation`: named routes the store requests
//! - `config`: file + environment configuration

pub mod api;
pub mod config;
pub mod models;
pub mod navigation;
pub mod session;
pub mod storage;

pub use api::{AuthError, AuthErrorKind, AuthService};
pub use config::Config;
pub use models::{Account, Credentials, RegistrationInfo, Role};
pub use navigation::{Navigator, Route, RouteHistory};
pub use session::{Session, SessionStore};
pub use storage::Storage;
