//! The agent-framework model adapter.
//!
//! [`ChatAdapter`] turns a framework [`ChatRequest`] into one SambaNova chat
//! completion and the completion back into a [`ChatResponse`]. The vendor
//! client is blocking, so each call runs on tokio's blocking pool while the
//! calling task waits.

pub mod convert;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use crate::client::{CompletionClient, SambaNovaClient};
use crate::config::SambaNovaConfig;
use crate::errors::{AdapterError, AdapterResult};
use crate::types::llm::{ChatRequest, ChatResponse};

/// Stream of responses produced by one generate call.
pub type ResponseStream = BoxStream<'static, AdapterResult<ChatResponse>>;

/// The model interface the agent framework drives.
#[async_trait]
pub trait LlmModel: Send + Sync {
    /// Model identifier used for every request.
    fn model(&self) -> &str;

    /// Produces the responses for `request`.
    ///
    /// Nothing runs until the stream is polled.
    fn generate_content(&self, request: ChatRequest, stream: bool) -> ResponseStream;

    /// Awaits the first response of [`generate_content`](Self::generate_content).
    async fn generate_once(&self, request: ChatRequest) -> AdapterResult<ChatResponse> {
        self.generate_content(request, false)
            .next()
            .await
            .unwrap_or_else(|| {
                Err(AdapterError::Worker {
                    message: "response stream ended without a response".to_string(),
                })
            })
    }
}

/// SambaNova-backed [`LlmModel`].
///
/// # Example
///
/// ```rust,no_run
/// use sambanova_adapter::{ChatAdapter, SambaNovaConfig};
/// use sambanova_adapter::types::llm::ChatRequest;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // The blocking HTTP client must be created outside the runtime.
///     let adapter = ChatAdapter::from_config(SambaNovaConfig::from_env()?)?;
///
///     let runtime = tokio::runtime::Runtime::new()?;
///     let response = runtime.block_on(
///         adapter.generate_once(ChatRequest::builder().user("Hello").build()),
///     )?;
///     println!("{}", response.text());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ChatAdapter {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl ChatAdapter {
    /// Creates an adapter over any completion backend.
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Creates an adapter around a SambaNova client, using its configured model.
    pub fn from_client(client: SambaNovaClient) -> Self {
        let model = client.config().model.clone();
        Self::new(Arc::new(client), model)
    }

    /// Creates an adapter from configuration. Call outside an async context.
    pub fn from_config(config: SambaNovaConfig) -> AdapterResult<Self> {
        SambaNovaClient::from_config(config).map(Self::from_client)
    }

    /// Creates an adapter from environment variables. Call outside an async context.
    pub fn from_env() -> AdapterResult<Self> {
        SambaNovaClient::from_env().map(Self::from_client)
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns a lazy stream yielding exactly one complete response.
    ///
    /// `stream` is accepted for interface compatibility; the vendor call is
    /// never streamed.
    pub fn generate(&self, request: ChatRequest, stream: bool) -> ResponseStream {
        let adapter = self.clone();

        Box::pin(async_stream::stream! {
            if stream {
                debug!(model = %adapter.model, "streaming requested; returning a single aggregated response");
            }
            yield adapter.generate_once(request).await;
        })
    }

    /// Performs one vendor call and converts its result.
    pub async fn generate_once(&self, request: ChatRequest) -> AdapterResult<ChatResponse> {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "sambanova.generate",
            %invocation_id,
            model = %self.model,
            turns = request.contents.len(),
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: ChatRequest) -> AdapterResult<ChatResponse> {
        let payload = convert::build_payload(&self.model, &request)?;
        let message_count = payload.messages.len();
        let tool_count = payload.tool_count();

        let client = Arc::clone(&self.client);
        let completion = tokio::task::spawn_blocking(move || client.create_completion(&payload))
            .await
            .unwrap_or_else(|e| {
                Err(AdapterError::Worker {
                    message: format!("completion task failed: {}", e),
                })
            });

        let completion = match completion {
            Ok(completion) => completion,
            Err(err) => {
                error!(
                    model = %self.model,
                    message_count,
                    tool_count,
                    error = %err,
                    "SambaNova call failed"
                );
                return Err(err);
            }
        };

        let parts = convert::parts_from_completion(&completion);
        debug!(
            choices = completion.choices.len(),
            parts = parts.len(),
            "SambaNova call succeeded"
        );

        Ok(ChatResponse::complete(parts))
    }
}

#[async_trait]
impl LlmModel for ChatAdapter {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate_content(&self, request: ChatRequest, stream: bool) -> ResponseStream {
        self.generate(request, stream)
    }

    async fn generate_once(&self, request: ChatRequest) -> AdapterResult<ChatResponse> {
        ChatAdapter::generate_once(self, request).await
    }
}

impl std::fmt::Debug for ChatAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAdapter")
            .field("model", &self.model)
            .finish()
    }
}
