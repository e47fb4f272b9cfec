//! Secure in-memory API key handling.

use std::sync::{Mutex, MutexGuard};

use crate::ProviderError;

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Holds the backend API key behind a lock; the key never appears in `Debug` output.
#[derive(Default)]
pub struct SecureCredentialManager {
    api_key: Mutex<Option<SecretString>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        *self.slot()? = Some(api_key);
        Ok(())
    }

    pub fn has_api_key(&self) -> Result<bool, ProviderError> {
        Ok(self.slot()?.is_some())
    }

    pub fn api_key(&self) -> Result<Option<SecretString>, ProviderError> {
        Ok(self.slot()?.clone())
    }

    pub fn with_api_key<R>(&self, f: impl FnOnce(&str) -> R) -> Result<Option<R>, ProviderError> {
        Ok(self.slot()?.as_ref().map(|secret| f(secret.expose())))
    }

    pub fn clear(&self) -> Result<bool, ProviderError> {
        Ok(self.slot()?.take().is_some())
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<SecretString>>, ProviderError> {
        self.api_key
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}

impl std::fmt::Debug for SecureCredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self.has_api_key().unwrap_or(false);
        f.debug_struct("SecureCredentialManager")
            .field("api_key_configured", &configured)
            .finish()
    }
}
