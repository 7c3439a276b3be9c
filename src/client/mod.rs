//! SambaNova API client.
//!
//! The client is blocking. [`CompletionClient`] is the seam the adapter
//! calls through, so tests can substitute the vendor entirely.

use std::sync::Arc;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{SambaNovaConfig, SambaNovaConfigBuilder};
use crate::errors::{AdapterError, AdapterResult};
use crate::observability::LogConfig;
use crate::services::CompletionsService;
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::completions::{CompletionRequest, CompletionResponse};

/// A blocking chat-completions backend.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionClient: Send + Sync {
    /// Performs one chat completion. Blocks the calling thread.
    fn create_completion(&self, request: &CompletionRequest) -> AdapterResult<CompletionResponse>;
}

/// The SambaNova client.
///
/// # Example
///
/// ```rust,no_run
/// use sambanova_adapter::{CompletionClient, SambaNovaClient};
/// use sambanova_adapter::types::completions::{ChatMessage, CompletionRequest};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SambaNovaClient::from_env()?;
///     let request = CompletionRequest::new(
///         client.config().model.clone(),
///         vec![ChatMessage::new("user", "Hello")],
///     );
///     let response = client.create_completion(&request)?;
///     println!("{:?}", response.choices.first());
///     Ok(())
/// }
/// ```
pub struct SambaNovaClient {
    config: SambaNovaConfig,
    completions: CompletionsService,
}

impl SambaNovaClient {
    /// Creates a new client builder.
    pub fn builder() -> SambaNovaClientBuilder {
        SambaNovaClientBuilder::new()
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> AdapterResult<Self> {
        let config = SambaNovaConfig::from_env()?;
        SambaNovaClientBuilder::from_config(config).build()
    }

    /// Creates a client from an existing configuration.
    pub fn from_config(config: SambaNovaConfig) -> AdapterResult<Self> {
        SambaNovaClientBuilder::from_config(config).build()
    }

    /// Returns the completions service.
    pub fn completions(&self) -> &CompletionsService {
        &self.completions
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SambaNovaConfig {
        &self.config
    }
}

impl CompletionClient for SambaNovaClient {
    fn create_completion(&self, request: &CompletionRequest) -> AdapterResult<CompletionResponse> {
        self.completions.create(request)
    }
}

impl std::fmt::Debug for SambaNovaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SambaNovaClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the SambaNova client.
pub struct SambaNovaClientBuilder {
    config: ConfigSource,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    log_config: LogConfig,
}

enum ConfigSource {
    Builder(SambaNovaConfigBuilder),
    Ready(SambaNovaConfig),
}

impl SambaNovaClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config: ConfigSource::Builder(SambaNovaConfigBuilder::new()),
            transport: None,
            auth: None,
            log_config: LogConfig::default(),
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: SambaNovaConfig) -> Self {
        Self {
            config: ConfigSource::Ready(config),
            ..Self::new()
        }
    }

    fn map_config(
        mut self,
        f: impl FnOnce(SambaNovaConfigBuilder) -> SambaNovaConfigBuilder,
    ) -> Self {
        self.config = match self.config {
            ConfigSource::Builder(builder) => ConfigSource::Builder(f(builder)),
            ConfigSource::Ready(config) => {
                let mut builder = SambaNovaConfigBuilder::new()
                    .api_key(config.api_key())
                    .base_url(config.base_url.clone())
                    .model(config.model.clone())
                    .timeout(config.timeout);
                for (name, value) in &config.custom_headers {
                    builder = builder.header(name.clone(), value.clone());
                }
                ConfigSource::Builder(f(builder))
            }
        };
        self
    }

    /// Sets the API key.
    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.map_config(|b| b.api_key(api_key))
    }

    /// Sets the base URL.
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.map_config(|b| b.base_url(base_url))
    }

    /// Sets the model identifier.
    pub fn model(self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.map_config(|b| b.model(model))
    }

    /// Sets the request timeout.
    pub fn timeout(self, timeout: std::time::Duration) -> Self {
        self.map_config(|b| b.timeout(timeout))
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the log configuration used when logging vendor error bodies.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Builds the client.
    ///
    /// Without a custom transport this creates a `reqwest::blocking` client,
    /// so call it outside an async context.
    pub fn build(self) -> AdapterResult<SambaNovaClient> {
        let config = match self.config {
            ConfigSource::Builder(builder) => builder.build()?,
            ConfigSource::Ready(config) => config,
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| AdapterError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::new(config.api_key.clone())),
        };
        auth.validate()?;

        let completions = CompletionsService::new(
            transport,
            auth,
            config.custom_headers.clone(),
            self.log_config,
        );

        Ok(SambaNovaClient {
            config,
            completions,
        })
    }
}

impl Default for SambaNovaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixtures, MockResponse, MockTransport};
    use crate::types::completions::ChatMessage;

    fn client_with(transport: Arc<MockTransport>) -> SambaNovaClient {
        SambaNovaClient::builder()
            .api_key("sn_test_key_12345")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = SambaNovaClientBuilder::new()
            .transport(Arc::new(MockTransport::new()))
            .build();
        assert!(matches!(result, Err(AdapterError::Configuration { .. })));
    }

    #[test]
    fn test_from_config_keeps_settings() {
        let config = SambaNovaConfig::builder()
            .api_key("sn_test_key")
            .model("Meta-Llama-3.1-8B-Instruct")
            .build()
            .unwrap();

        let client = SambaNovaClientBuilder::from_config(config)
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();

        assert_eq!(client.config().model, "Meta-Llama-3.1-8B-Instruct");
    }

    #[test]
    fn test_builder_overrides_ready_config() {
        let config = SambaNovaConfig::builder()
            .api_key("sn_test_key")
            .build()
            .unwrap();

        let client = SambaNovaClientBuilder::from_config(config)
            .model("other-model")
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();

        assert_eq!(client.config().model, "other-model");
        assert_eq!(client.config().api_key(), "sn_test_key");
    }

    #[test]
    fn test_create_completion_sends_authorized_post() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&fixtures::text_completion("Hello")));
        let client = client_with(Arc::clone(&transport));

        let request = CompletionRequest::new("m", vec![ChatMessage::new("user", "Hi")]);
        let response = client.create_completion(&request).unwrap();

        assert_eq!(response.choices.len(), 1);
        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.path, "chat/completions");
        assert_eq!(
            recorded.headers.get("Authorization").map(String::as_str),
            Some("Bearer sn_test_key_12345")
        );
        let body: serde_json::Value =
            serde_json::from_slice(recorded.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["messages"][0]["content"], "Hi");
    }
}
