//! Greeting agent backed by SambaNova, with no tools.
//!
//! Reads `SAMBANOVA_API_KEY` from the environment or a `.env` file and sends
//! one message under a greeting instruction.
//!
//! ```text
//! cargo run --example greeting_agent -- "Hi, I'm Sam"
//! ```

use tracing::info;

use sambanova_adapter::observability::{init_tracing, LogConfig};
use sambanova_adapter::{ChatAdapter, ChatRequest, LlmModel};

const INSTRUCTION: &str = "You are a friendly agent. Greet the user warmly, use their name \
if they give one, and keep the reply to a sentence or two.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing(&LogConfig::default())?;

    let message = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello!".to_string());

    // The blocking HTTP client is created before the runtime starts.
    let adapter = ChatAdapter::from_env()?;
    info!(model = adapter.model(), "adapter ready");

    let request = ChatRequest::builder()
        .system(INSTRUCTION)
        .user(message)
        .build();

    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(adapter.generate_once(request))?;

    println!("{}", response.text());
    Ok(())
}
