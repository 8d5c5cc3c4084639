use std::collections::HashMap;
use std::sync::Mutex;

use albumup_core::error::AlbumupError;

/// Keychain entry holding the photo library access token.
pub const ACCESS_TOKEN_KEY: &str = "albumup:google-photos";

/// Environment variable that overrides the stored access token.
pub const ACCESS_TOKEN_ENV: &str = "ALBUMUP_ACCESS_TOKEN";

/// Trait for credential storage backends.
pub trait CredentialStore: Send + Sync {
    /// Store a secret under the given key.
    fn store(&self, key: &str, secret: &str) -> Result<(), AlbumupError>;

    /// Retrieve a secret by key.
    fn get(&self, key: &str) -> Result<Option<String>, AlbumupError>;

    /// Delete a stored secret.
    fn delete(&self, key: &str) -> Result<(), AlbumupError>;
}

/// Find the access token: the environment wins over the store.
pub fn resolve_access_token(store: &dyn CredentialStore) -> Result<Option<String>, AlbumupError> {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        let token = token.trim().to_string();
        if !token.is_empty() {
            tracing::debug!("using access token from {ACCESS_TOKEN_ENV}");
            return Ok(Some(token));
        }
    }
    store.get(ACCESS_TOKEN_KEY)
}

fn credential_error(e: keyring::Error) -> AlbumupError {
    AlbumupError::CredentialError {
        message: e.to_string(),
    }
}

/// OS keychain-backed credential store using the `keyring` crate.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: "albumup".to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, AlbumupError> {
        keyring::Entry::new(&self.service, key).map_err(credential_error)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), AlbumupError> {
        self.entry(key)?.set_password(secret).map_err(credential_error)
    }

    fn get(&self, key: &str) -> Result<Option<String>, AlbumupError> {
        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(credential_error(e)),
        }
    }

    fn delete(&self, key: &str) -> Result<(), AlbumupError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(credential_error(e)),
        }
    }
}

/// In-memory credential store for testing.
#[derive(Default)]
pub struct MemoryStore {
    secrets: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), AlbumupError> {
        self.secrets
            .lock()
            .unwrap()
            .insert(key.to_string(), secret.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, AlbumupError> {
        Ok(self.secrets.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), AlbumupError> {
        self.secrets.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        store.store(ACCESS_TOKEN_KEY, "ya29.secret").unwrap();
        assert_eq!(
            store.get(ACCESS_TOKEN_KEY).unwrap(),
            Some("ya29.secret".to_string())
        );
        store.delete(ACCESS_TOKEN_KEY).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_delete_nonexistent() {
        let store = MemoryStore::new();
        store.delete("no-such-key").unwrap();
    }

    #[test]
    fn test_resolve_falls_back_to_store() {
        let store = MemoryStore::new();
        store.store(ACCESS_TOKEN_KEY, "stored").unwrap();
        if std::env::var(ACCESS_TOKEN_ENV).is_err() {
            assert_eq!(
                resolve_access_token(&store).unwrap(),
                Some("stored".to_string())
            );
        }
    }
}
