//! Weather and time agent backed by SambaNova.
//!
//! Reads `SAMBANOVA_API_KEY` (and the optional `SAMBANOVA_*` settings) from
//! the environment or a `.env` file, asks one question with the
//! `get_weather` and `get_current_time` tools available, runs any tool the
//! model calls, and asks again with the results.
//!
//! ```text
//! cargo run --example tool_agent -- "What time is it in New York?"
//! ```

use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use serde_json::{json, Map, Value};
use tracing::info;

use sambanova_adapter::observability::{init_tracing, LogConfig};
use sambanova_adapter::{
    ChatAdapter, ChatRequest, ChatRequestBuilder, FunctionDeclaration, LlmModel, Tool,
};

const INSTRUCTION: &str = "You are a helpful agent who can answer user questions about the \
time and weather in a city. Use the available tools when a question needs them.";

fn city_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "city": { "type": "string", "description": description }
        },
        "required": ["city"]
    })
}

fn tools() -> Vec<Tool> {
    vec![
        Tool::function(FunctionDeclaration::new(
            "get_weather",
            "Retrieves the current weather report for a specified city.",
            city_schema("The name of the city for which to retrieve the weather report."),
        )),
        Tool::function(FunctionDeclaration::new(
            "get_current_time",
            "Returns the current time in a specified city.",
            city_schema("The name of the city for which to retrieve the current time."),
        )),
    ]
}

fn city_arg(args: &Map<String, Value>) -> &str {
    args.get("city").and_then(Value::as_str).unwrap_or_default()
}

fn is_new_york(city: &str) -> bool {
    city.trim().eq_ignore_ascii_case("new york")
}

fn get_weather(city: &str) -> Value {
    if is_new_york(city) {
        json!({
            "status": "success",
            "report": "The weather in New York is sunny with a temperature of 25 degrees \
                       Celsius (77 degrees Fahrenheit)."
        })
    } else {
        json!({
            "status": "error",
            "error_message": format!("Weather information for '{}' is not available.", city)
        })
    }
}

fn get_current_time(city: &str) -> Value {
    current_time_at(city, Utc::now())
}

fn current_time_at(city: &str, now: DateTime<Utc>) -> Value {
    if !is_new_york(city) {
        return json!({
            "status": "error",
            "error_message": format!("Sorry, I don't have timezone information for {}.", city)
        });
    }

    let local = now.with_timezone(&New_York);
    json!({
        "status": "success",
        "report": format!(
            "The current time in {} is {}",
            city,
            local.format("%Y-%m-%d %H:%M:%S %Z%z")
        )
    })
}

fn run_tool(name: &str, args: &Map<String, Value>) -> Value {
    match name {
        "get_weather" => get_weather(city_arg(args)),
        "get_current_time" => get_current_time(city_arg(args)),
        other => json!({ "status": "error", "error_message": format!("unknown tool '{}'", other) }),
    }
}

fn base_request(question: &str) -> ChatRequestBuilder {
    let builder = ChatRequest::builder().system(INSTRUCTION).user(question);
    tools().into_iter().fold(builder, ChatRequestBuilder::tool)
}

async fn answer(adapter: &dyn LlmModel, question: &str) -> Result<String, Box<dyn std::error::Error>> {
    let first = adapter.generate_once(base_request(question).build()).await?;

    let results: Vec<String> = first
        .function_calls()
        .map(|(name, args)| {
            let result = run_tool(name, args);
            info!(tool = name, %result, "ran tool");
            format!("Result of {}: {}", name, result)
        })
        .collect();

    if results.is_empty() {
        return Ok(first.text());
    }

    // Tool output goes back as text; only text parts reach the vendor.
    let mut follow_up = base_request(question);
    if !first.text().is_empty() {
        follow_up = follow_up.model(first.text());
    }
    let follow_up = follow_up.user(results.join("\n")).build();

    Ok(adapter.generate_once(follow_up).await?.text())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing(&LogConfig::default())?;

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What's the weather in New York?".to_string());

    // The blocking HTTP client is created before the runtime starts.
    let adapter = ChatAdapter::from_env()?;
    info!(model = adapter.model(), "adapter ready");

    let runtime = tokio::runtime::Runtime::new()?;
    let reply = runtime.block_on(answer(&adapter, &question))?;

    println!("{}", reply);
    Ok(())
}
