//! Authentication for SambaNova requests.
//!
//! SambaNova uses bearer-token authentication with a single API key.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::key_hint;
use crate::errors::AdapterError;

/// Adds credentials to outgoing SambaNova requests.
pub trait AuthProvider: Send + Sync {
    /// Inserts the credential headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Scheme name, e.g. `Bearer`.
    fn scheme(&self) -> &str;

    /// Checks the credential before the first request is sent.
    fn validate(&self) -> Result<(), AdapterError>;

    /// Hint identifying the credential in error messages.
    fn hint(&self) -> Option<String> {
        None
    }
}

/// Bearer authentication with a SambaNova API key.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Wraps an already-secret key.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Wraps a plain string key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Last four characters of the key, for diagnostics.
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> Result<(), AdapterError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(AdapterError::Authentication {
                message: "API key cannot be empty".to_string(),
                api_key_hint: None,
            });
        }

        Ok(())
    }

    fn hint(&self) -> Option<String> {
        Some(self.key_hint())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
