//! Session state for the application.
//!
//! `SessionStore` owns the signed-in account and token, rehydrates them from
//! storage at startup, and drives login, registration and logout. It is an
//! explicit instance: build one per application root and share it.

pub mod store;

pub use store::{Session, SessionStore};
