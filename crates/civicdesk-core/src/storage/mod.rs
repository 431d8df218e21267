//! Durable key-value storage used to rehydrate the session at startup.
//!
//! This module provides:
//! - `Storage`: the synchronous get/set/remove contract
//! - `MemoryStorage`: in-process map for tests and throwaway runs
//! - `FileStorage`: one JSON file per key in a scope directory
//! - `KeyringStorage`: OS keychain entries via `keyring`
//!
//! The session store writes exactly two keys, `user` and `token`.

pub mod file;
pub mod keychain;
pub mod memory;

use anyhow::Result;

pub use self::file::FileStorage;
pub use self::keychain::KeyringStorage;
pub use self::memory::MemoryStorage;

/// Key holding the JSON-serialized account.
pub const USER_KEY: &str = "user";

/// Key holding the raw token string.
pub const TOKEN_KEY: &str = "token";

/// Scoped durable key-value storage.
///
/// Calls are synchronous from the caller's point of view. Removing a key
/// that does not exist succeeds.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
