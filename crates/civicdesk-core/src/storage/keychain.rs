use anyhow::{Context, Result};
use keyring::Entry;

use super::Storage;

const SERVICE_PREFIX: &str = "civicdesk";

/// OS keychain storage. Each key is one keychain entry under the scope's
/// service name.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new(scope: Option<&str>) -> Self {
        Self {
            service: Self::service_name(scope),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn service_name(scope: Option<&str>) -> String {
        match scope {
            Some(scope) if !scope.is_empty() => format!("{}.{}", SERVICE_PREFIX, scope),
            _ => SERVICE_PREFIX.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl Storage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve value from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .context("Failed to store value in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete value from keychain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_includes_scope() {
        assert_eq!(KeyringStorage::new(None).service(), "civicdesk");
        assert_eq!(KeyringStorage::new(Some("")).service(), "civicdesk");
        assert_eq!(
            KeyringStorage::new(Some("staging")).service(),
            "civicdesk.staging"
        );
    }
}
