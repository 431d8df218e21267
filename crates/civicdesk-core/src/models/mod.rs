//! Data models shared by the session store, the auth service and the UI.
//!
//! - `Account` and `Role`: the identity issued by the backend
//! - `Credentials` and `RegistrationInfo`: transient form input

pub mod account;

pub use account::{Account, Credentials, RegistrationInfo, Role};
