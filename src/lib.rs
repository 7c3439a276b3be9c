//! SambaNova Model Adapter
//!
//! Lets an agent framework use SambaNova-hosted models. The adapter accepts
//! the framework's generic chat request, flattens it into SambaNova's
//! chat-completions format, runs the blocking vendor call off the async
//! executor, and converts the completion back into the framework's response
//! shape: text parts and tool-call parts.
//!
//! # Features
//!
//! - **Framework Interface**: [`LlmModel`] with a lazy single-response stream
//! - **Tool Calling**: function declarations out, parsed function calls back
//! - **Non-blocking**: the blocking HTTP call runs on tokio's blocking pool
//! - **Typed Errors**: vendor failures mapped by HTTP status
//! - **Observability**: tracing spans per invocation, redacted error bodies
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sambanova_adapter::{ChatAdapter, ChatRequest, FunctionDeclaration, Tool};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = ChatAdapter::from_env()?;
//!
//!     let request = ChatRequest::builder()
//!         .user("What's the weather in New York?")
//!         .tool(Tool::function(FunctionDeclaration::new(
//!             "get_weather",
//!             "Retrieves the current weather report for a specified city.",
//!             serde_json::json!({
//!                 "type": "object",
//!                 "properties": { "city": { "type": "string" } },
//!                 "required": ["city"]
//!             }),
//!         )))
//!         .build();
//!
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let response = runtime.block_on(adapter.generate_once(request))?;
//!     for (name, args) in response.function_calls() {
//!         println!("{}({:?})", name, args);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use adapter::{ChatAdapter, LlmModel, ResponseStream};
pub use client::{CompletionClient, SambaNovaClient, SambaNovaClientBuilder};
pub use config::{SambaNovaConfig, SambaNovaConfigBuilder};
pub use errors::{AdapterError, AdapterResult};

// Type re-exports
pub use types::content::{Content, FunctionCall, FunctionResponse, Part, Role};
pub use types::llm::{ChatRequest, ChatRequestBuilder, ChatResponse, ResponsePart};
pub use types::tools::{FunctionDeclaration, Tool};

/// Mock implementations for testing.
pub mod mocks;
