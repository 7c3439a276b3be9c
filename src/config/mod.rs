//! Configuration module for the SambaNova adapter.
//!
//! Configuration is read once at startup, either through the builder or from
//! the environment, and is read-only afterwards.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{AdapterError, AdapterResult};

/// Default base URL for the SambaNova API.
pub const DEFAULT_BASE_URL: &str = "https://api.sambanova.ai/v1";

/// Default model served by the adapter.
pub const DEFAULT_MODEL: &str = "Meta-Llama-3.3-70B-Instruct";

/// Default request timeout (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the SambaNova client and adapter.
#[derive(Clone)]
pub struct SambaNovaConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl SambaNovaConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> SambaNovaConfigBuilder {
        SambaNovaConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SAMBANOVA_API_KEY` (required): API key for authentication
    /// - `SAMBANOVA_BASE_URL` (optional): Custom base URL
    /// - `SAMBANOVA_MODEL` (optional): Model identifier
    /// - `SAMBANOVA_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> AdapterResult<Self> {
        let api_key = std::env::var("SAMBANOVA_API_KEY")
            .map_err(|_| AdapterError::configuration("SAMBANOVA_API_KEY environment variable not set"))?;

        let mut builder = SambaNovaConfigBuilder::new().api_key(api_key);

        if let Ok(base_url) = std::env::var("SAMBANOVA_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(model) = std::env::var("SAMBANOVA_MODEL") {
            builder = builder.model(model);
        }

        if let Ok(timeout_str) = std::env::var("SAMBANOVA_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout_secs) => builder = builder.timeout_secs(timeout_secs),
                Err(_) => tracing::warn!(
                    value = %timeout_str,
                    "ignoring unparseable SAMBANOVA_TIMEOUT"
                ),
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

pub(crate) fn key_hint(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 4 {
        format!("...{}", chars[chars.len() - 4..].iter().collect::<String>())
    } else {
        "****".to_string()
    }
}

impl std::fmt::Debug for SambaNovaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SambaNovaConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for `SambaNovaConfig`.
#[derive(Default)]
pub struct SambaNovaConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl SambaNovaConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> AdapterResult<SambaNovaConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| AdapterError::configuration("API key is required"))?;

        if api_key.trim().is_empty() {
            return Err(AdapterError::configuration("API key cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        if parsed.scheme() != "https" {
            return Err(AdapterError::configuration("Base URL must use HTTPS"));
        }

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.is_empty() {
            return Err(AdapterError::configuration("Model cannot be empty"));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(AdapterError::configuration("Timeout must be non-zero"));
        }

        Ok(SambaNovaConfig {
            api_key: SecretString::new(api_key),
            base_url,
            model,
            timeout,
            custom_headers: self.custom_headers,
        })
    }
}
