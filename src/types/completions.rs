//! SambaNova chat-completions wire types.
//!
//! Response types default every field, so a reply that omits `message`,
//! `content` or `tool_calls` decodes to "nothing to add" instead of failing.

use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Model ID.
    pub model: String,

    /// Flattened conversation.
    pub messages: Vec<ChatMessage>,

    /// Tools/functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<VendorTool>>,

    /// Tool choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl CompletionRequest {
    /// Creates a request without tools.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            tool_choice: None,
        }
    }

    /// Attaches tools with automatic tool selection.
    ///
    /// An empty tool list leaves the request untouched.
    pub fn with_tools(mut self, tools: Vec<VendorTool>) -> Self {
        if !tools.is_empty() {
            self.tools = Some(tools);
            self.tool_choice = Some(ToolChoice::Auto);
        }
        self
    }

    /// Number of tools attached.
    pub fn tool_count(&self) -> usize {
        self.tools.as_ref().map_or(0, Vec::len)
    }
}

/// A flattened chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message role.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Tool definition for function calling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorTool {
    /// Tool type (always "function").
    #[serde(rename = "type")]
    pub type_: String,

    /// Function definition.
    pub function: FunctionDefinition,
}

impl VendorTool {
    /// Creates a function tool.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            type_: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function definition within a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    /// Function name.
    pub name: String,

    /// Function description.
    pub description: String,

    /// JSON Schema for function parameters.
    pub parameters: serde_json::Value,
}

/// Tool choice mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides whether to call tools.
    Auto,
    /// Don't call any tools.
    None,
    /// Must call at least one tool.
    Required,
}

/// Chat completion response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Response ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Model ID.
    #[serde(default)]
    pub model: Option<String>,

    /// Response choices. `null` decodes as no choices.
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,

    /// Token usage.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Response choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    /// Choice index.
    #[serde(default)]
    pub index: Option<u32>,

    /// Assistant message.
    #[serde(default)]
    pub message: Option<AssistantMessage>,

    /// Finish reason, kept as the vendor's raw string.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message in a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Message role.
    #[serde(default)]
    pub role: Option<String>,

    /// Message content.
    #[serde(default)]
    pub content: Option<String>,

    /// Tool calls.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Tool call from the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool call ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Tool type.
    #[serde(rename = "type", default)]
    pub type_: Option<String>,

    /// Function call details.
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

/// Function call details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    #[serde(default)]
    pub name: Option<String>,

    /// Function arguments. Any JSON decodes here; only a string holding a
    /// JSON object is usable.
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

impl FunctionCall {
    /// Creates a call with string-encoded arguments.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            arguments: Some(serde_json::Value::String(arguments.into())),
        }
    }
}

/// Token usage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: Option<u32>,

    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: Option<u32>,

    /// Total tokens.
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_without_tools_omits_tool_fields() {
        let request = CompletionRequest::new(
            "Meta-Llama-3.3-70B-Instruct",
            vec![ChatMessage::new("user", "Hello")],
        )
        .with_tools(vec![]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "Meta-Llama-3.3-70B-Instruct",
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn test_request_with_tools_sets_auto_choice() {
        let request = CompletionRequest::new("m", vec![ChatMessage::new("user", "Hi")]).with_tools(
            vec![VendorTool::function(
                "get_current_time",
                "Returns the current time",
                serde_json::json!({"type": "object", "properties": {}}),
            )],
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "get_current_time");
        assert_eq!(request.tool_count(), 1);
    }

    #[test]
    fn test_response_decodes_full_payload() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1705312345,
            "model": "Meta-Llama-3.3-70B-Instruct",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"NY\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        let message = response.choices[0].message.as_ref().unwrap();
        assert!(message.content.is_none());
        let calls = message.tool_calls.as_ref().unwrap();
        let function = calls[0].function.as_ref().unwrap();
        assert_eq!(function.name.as_deref(), Some("get_weather"));
        assert_eq!(
            function.arguments.as_ref().and_then(|a| a.as_str()),
            Some(r#"{"city":"NY"}"#)
        );
        assert_eq!(response.usage.unwrap().total_tokens, Some(15));
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());

        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices": [{}, {"message": {}}]}"#).unwrap();
        assert_eq!(response.choices.len(), 2);
        assert!(response.choices[0].message.is_none());
        assert!(response.choices[1]
            .message
            .as_ref()
            .unwrap()
            .tool_calls
            .is_none());
    }

    #[test]
    fn test_response_tolerates_nulls() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": null}"#).unwrap();
        assert!(response.choices.is_empty());

        let response: CompletionResponse = serde_json::from_str(
            r#"{
                "choices": [{"index": null, "message": {"content": "ok", "tool_calls": null}}],
                "usage": {"prompt_tokens": null, "total_tokens": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(response.choices[0].index, None);
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, None);
        assert_eq!(usage.total_tokens, Some(3));
    }

    #[test]
    fn test_non_string_arguments_still_decode() {
        let call: ToolCall = serde_json::from_str(
            r#"{"function": {"name": "get_weather", "arguments": {"city": "LA"}}}"#,
        )
        .unwrap();

        let arguments = call.function.unwrap().arguments.unwrap();
        assert_eq!(arguments["city"], "LA");
    }
}
