//! Translation between framework requests/responses and the vendor wire format.

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::errors::{AdapterError, AdapterResult};
use crate::types::completions::{
    ChatMessage, CompletionRequest, CompletionResponse, ToolCall, VendorTool,
};
use crate::types::content::Content;
use crate::types::llm::{ChatRequest, ResponsePart};
use crate::types::tools::Tool;

const EMPTY_ARGUMENTS: &str = "{}";

/// Builds the vendor payload for `request`.
///
/// Fails with [`AdapterError::InvalidRequest`] for an empty conversation or a
/// tool that declares no functions.
pub fn build_payload(model: &str, request: &ChatRequest) -> AdapterResult<CompletionRequest> {
    request.validate()?;

    let messages = flatten_turns(&request.contents);
    let tools = convert_tools(request.tools());

    Ok(CompletionRequest::new(model, messages).with_tools(tools))
}

/// One message per turn, same order, role copied verbatim.
pub fn flatten_turns(contents: &[Content]) -> Vec<ChatMessage> {
    contents
        .iter()
        .map(|content| ChatMessage::new(content.role.as_str(), content.flattened_text()))
        .collect()
}

/// One vendor tool per framework tool, built from its first declaration.
pub fn convert_tools(tools: &[Tool]) -> Vec<VendorTool> {
    tools
        .iter()
        .filter_map(|tool| {
            let declaration = tool.primary_declaration()?;

            if tool.function_declarations.len() > 1 {
                let dropped: Vec<&str> = tool.function_declarations[1..]
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect();
                warn!(
                    tool = %declaration.name,
                    dropped = ?dropped,
                    "tool declares several functions; only the first is sent"
                );
            }

            let parameters = declaration
                .parameters
                .clone()
                .unwrap_or_else(empty_object_schema);

            Some(VendorTool::function(
                declaration.name.clone(),
                declaration.description.clone(),
                parameters,
            ))
        })
        .collect()
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Collects response parts from every choice, in vendor order.
///
/// Tool calls whose arguments cannot be used are logged and left out.
pub fn parts_from_completion(response: &CompletionResponse) -> Vec<ResponsePart> {
    let mut parts = Vec::new();

    for message in response.choices.iter().filter_map(|c| c.message.as_ref()) {
        if let Some(content) = message.content.as_deref().filter(|c| !c.is_empty()) {
            parts.push(ResponsePart::Text {
                value: content.to_string(),
            });
        }

        for call in message.tool_calls.iter().flatten() {
            match parse_tool_call(call) {
                Some(Ok(part)) => parts.push(part),
                Some(Err(err)) => {
                    error!(
                        error = %err,
                        tool_call_id = call.id.as_deref().unwrap_or(""),
                        "skipping tool call with malformed arguments"
                    );
                }
                None => {}
            }
        }
    }

    parts
}

/// Converts one vendor tool call.
///
/// Returns `None` when the call carries no function. Missing arguments are
/// read as `"{}"`.
pub fn parse_tool_call(call: &ToolCall) -> Option<AdapterResult<ResponsePart>> {
    let function = call.function.as_ref()?;
    let name = function.name.clone().unwrap_or_default();

    let args = match &function.arguments {
        None => parse_arguments(&name, EMPTY_ARGUMENTS),
        Some(Value::String(encoded)) => parse_arguments(&name, encoded),
        Some(other) => Err(AdapterError::MalformedToolArguments {
            name: name.clone(),
            message: format!("expected a JSON-encoded string, got {}", json_kind(other)),
            arguments: other.to_string(),
        }),
    };

    Some(args.map(|args| ResponsePart::FunctionCall { name, args }))
}

fn parse_arguments(name: &str, arguments: &str) -> AdapterResult<Map<String, Value>> {
    let malformed = |message: String| AdapterError::MalformedToolArguments {
        name: name.to_string(),
        message,
        arguments: arguments.to_string(),
    };

    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(args)) => Ok(args),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::fixtures;
    use crate::types::completions::{FunctionCall, ToolChoice};
    use crate::types::content::{Part, Role};
    use crate::types::tools::FunctionDeclaration;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_flatten_preserves_order_and_roles() {
        let contents = vec![
            Content::system("Be brief."),
            fixtures::fragmented_user_turn(&["What is ", "", "the weather ", "in NY?"]),
            Content::new(Role::Model, vec![]),
        ];

        let messages = flatten_turns(&contents);

        assert_eq!(
            messages,
            vec![
                ChatMessage::new("system", "Be brief."),
                ChatMessage::new("user", "What is the weather in NY?"),
                ChatMessage::new("model", ""),
            ]
        );
    }

    #[test]
    fn test_build_payload_rejects_empty_contents() {
        let result = build_payload("m", &ChatRequest::default());
        assert!(matches!(result, Err(AdapterError::InvalidRequest { .. })));
    }

    #[test]
    fn test_build_payload_with_single_tool() {
        let request = ChatRequest::builder()
            .user("Weather in NY?")
            .tool(fixtures::weather_tool())
            .build();

        let payload = build_payload("Meta-Llama-3.3-70B-Instruct", &request).unwrap();

        let tools = payload.tools.as_ref().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].type_, "function");
        assert_eq!(tools[0].function.name, "get_weather");
        assert_eq!(tools[0].function.parameters, fixtures::weather_schema());
        assert_eq!(payload.tool_choice, Some(ToolChoice::Auto));
    }

    #[test]
    fn test_build_payload_without_tools_omits_tool_fields() {
        let request = ChatRequest::builder().user("Hello").build();

        let payload = build_payload("m", &request).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }

    #[test]
    fn test_convert_tools_uses_first_declaration_only() {
        let tool = Tool {
            function_declarations: vec![
                FunctionDeclaration::new("get_weather", "weather", fixtures::weather_schema()),
                FunctionDeclaration::new("get_current_time", "time", serde_json::json!({})),
            ],
        };

        let converted = convert_tools(&[tool]);

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].function.name, "get_weather");
    }

    #[test]
    fn test_convert_tools_defaults_missing_schema() {
        let tool = Tool::function(FunctionDeclaration {
            name: "get_current_time".to_string(),
            description: "Returns the current time".to_string(),
            parameters: None,
        });

        let converted = convert_tools(&[tool]);

        assert_eq!(
            converted[0].function.parameters,
            serde_json::json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_text_choice_yields_single_text_part() {
        let parts = parts_from_completion(&fixtures::text_completion("Hello"));

        assert_eq!(
            parts,
            vec![ResponsePart::Text {
                value: "Hello".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_content_is_not_a_part() {
        let parts = parts_from_completion(&fixtures::text_completion(""));
        assert!(parts.is_empty());
    }

    #[test]
    fn test_malformed_tool_call_is_skipped() {
        let response = fixtures::tool_call_completion(&[
            ("get_weather", r#"{"city":"NY"}"#),
            ("get_weather", "{bad"),
        ]);

        let parts = parts_from_completion(&response);

        assert_eq!(parts.len(), 1);
        match &parts[0] {
            ResponsePart::FunctionCall { name, args } => {
                assert_eq!(name, "get_weather");
                assert_eq!(args["city"], "NY");
            }
            other => panic!("Expected FunctionCall, got {:?}", other),
        }
    }

    #[test]
    fn test_choices_without_message_are_skipped() {
        let response = fixtures::completion(serde_json::json!([
            {"index": 0},
            {"index": 1, "message": {"content": "second"}}
        ]));

        let parts = parts_from_completion(&response);

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].as_text(), Some("second"));
    }

    #[test]
    fn test_text_and_tool_calls_keep_vendor_order() {
        let response = fixtures::completion(serde_json::json!([{
            "message": {
                "content": "Checking.",
                "tool_calls": [{"function": {"name": "get_current_time"}}]
            }
        }]));

        let parts = parts_from_completion(&response);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_text(), Some("Checking."));
        assert!(matches!(
            &parts[1],
            ResponsePart::FunctionCall { name, args } if name == "get_current_time" && args.is_empty()
        ));
    }

    #[test]
    fn test_tool_call_without_function_is_skipped() {
        let call = ToolCall {
            id: Some("call_0".to_string()),
            type_: Some("function".to_string()),
            function: None,
        };
        assert!(parse_tool_call(&call).is_none());
    }

    #[test]
    fn test_tool_call_without_name_defaults_to_empty() {
        let call = ToolCall {
            function: Some(FunctionCall {
                name: None,
                arguments: Some(Value::from(r#"{"a":1}"#)),
            }),
            ..ToolCall::default()
        };

        match parse_tool_call(&call) {
            Some(Ok(ResponsePart::FunctionCall { name, args })) => {
                assert_eq!(name, "");
                assert_eq!(args["a"], 1);
            }
            other => panic!("Expected FunctionCall, got {:?}", other),
        }
    }

    #[test_case("{bad" ; "truncated json")]
    #[test_case("[1, 2]" ; "array")]
    #[test_case("\"NY\"" ; "string")]
    #[test_case("null" ; "null")]
    fn test_unusable_arguments_are_malformed(arguments: &str) {
        let call = ToolCall {
            function: Some(FunctionCall::new("get_weather", arguments)),
            ..ToolCall::default()
        };

        match parse_tool_call(&call) {
            Some(Err(AdapterError::MalformedToolArguments {
                name,
                arguments: raw,
                ..
            })) => {
                assert_eq!(name, "get_weather");
                assert_eq!(raw, arguments);
            }
            other => panic!("Expected MalformedToolArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_function_call_parts_are_not_flattened() {
        let content = Content::new(
            Role::Model,
            vec![Part::FunctionCall {
                function_call: crate::types::content::FunctionCall {
                    name: "get_weather".to_string(),
                    args: serde_json::json!({"city": "NY"}),
                },
            }],
        );

        assert_eq!(flatten_turns(&[content])[0].content, "");
    }

    #[test]
    fn test_object_arguments_are_malformed_but_siblings_survive() {
        let response = fixtures::completion(serde_json::json!([{
            "message": {
                "content": "ok",
                "tool_calls": [
                    {"function": {"name": "get_weather", "arguments": "{\"city\":\"NY\"}"}},
                    {"function": {"name": "get_weather", "arguments": {"city": "LA"}}}
                ]
            }
        }]));

        let parts = parts_from_completion(&response);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_text(), Some("ok"));
        assert!(matches!(
            &parts[1],
            ResponsePart::FunctionCall { args, .. } if args["city"] == "NY"
        ));
    }

    #[test]
    fn test_non_string_arguments_report_raw_json() {
        let call = ToolCall {
            function: Some(FunctionCall {
                name: Some("get_weather".to_string()),
                arguments: Some(serde_json::json!(["LA"])),
            }),
            ..ToolCall::default()
        };

        match parse_tool_call(&call) {
            Some(Err(AdapterError::MalformedToolArguments { arguments, .. })) => {
                assert_eq!(arguments, r#"["LA"]"#);
            }
            other => panic!("Expected MalformedToolArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_arguments_default_to_empty_object() {
        let call = ToolCall {
            function: Some(FunctionCall {
                name: Some("get_current_time".to_string()),
                arguments: None,
            }),
            ..ToolCall::default()
        };

        match parse_tool_call(&call) {
            Some(Ok(ResponsePart::FunctionCall { args, .. })) => assert!(args.is_empty()),
            other => panic!("Expected FunctionCall, got {:?}", other),
        }
    }
}
