//! Generic model request and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::{Content, Role};
use super::tools::Tool;
use crate::errors::{AdapterError, AdapterResult};

/// A chat-generation request from the agent framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Conversation turns, in order.
    pub contents: Vec<Content>,
    /// Tools the model may call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl ChatRequest {
    /// Creates a request from turns.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            tools: None,
        }
    }

    /// Creates a new request builder.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// Returns the supplied tools, or an empty slice.
    pub fn tools(&self) -> &[Tool] {
        self.tools.as_deref().unwrap_or_default()
    }

    /// Checks the request before any vendor call is attempted.
    pub fn validate(&self) -> AdapterResult<()> {
        if self.contents.is_empty() {
            return Err(AdapterError::invalid_param(
                "request must contain at least one turn",
                "contents",
            ));
        }

        for (i, tool) in self.tools().iter().enumerate() {
            if tool.function_declarations.is_empty() {
                return Err(AdapterError::invalid_param(
                    format!("tool {} declares no functions", i),
                    format!("tools[{}]", i),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for `ChatRequest`.
#[derive(Debug, Default)]
pub struct ChatRequestBuilder {
    contents: Vec<Content>,
    tools: Option<Vec<Tool>>,
}

impl ChatRequestBuilder {
    /// Adds a turn.
    pub fn content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    /// Adds a system turn.
    pub fn system(self, text: impl Into<String>) -> Self {
        self.content(Content::system(text))
    }

    /// Adds a user turn.
    pub fn user(self, text: impl Into<String>) -> Self {
        self.content(Content::user(text))
    }

    /// Adds a model turn.
    pub fn model(self, text: impl Into<String>) -> Self {
        self.content(Content::model(text))
    }

    /// Adds a tool.
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    /// Builds the request without validating it.
    ///
    /// Validation happens in the adapter so that an empty request surfaces
    /// as an error from `generate`.
    pub fn build(self) -> ChatRequest {
        ChatRequest {
            contents: self.contents,
            tools: self.tools,
        }
    }
}

/// One fragment of a model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Plain text.
    Text {
        /// The text.
        value: String,
    },
    /// The model asks for a tool to be invoked.
    FunctionCall {
        /// Function name.
        name: String,
        /// Parsed arguments.
        args: Map<String, Value>,
    },
}

impl ResponsePart {
    /// Returns the text if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponsePart::Text { value } => Some(value),
            ResponsePart::FunctionCall { .. } => None,
        }
    }
}

/// A model response handed back to the agent framework.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// Always [`Role::Model`] for adapter output.
    pub role: Role,
    /// Response fragments, in vendor order.
    pub parts: Vec<ResponsePart>,
    /// True for an incremental fragment, false for a complete response.
    pub partial: bool,
}

impl ChatResponse {
    /// Creates a complete model response.
    pub fn complete(parts: Vec<ResponsePart>) -> Self {
        Self {
            role: Role::Model,
            parts,
            partial: false,
        }
    }

    /// Concatenates all text parts.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(ResponsePart::as_text).collect()
    }

    /// Iterates the function calls as `(name, args)`.
    pub fn function_calls(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.parts.iter().filter_map(|part| match part {
            ResponsePart::FunctionCall { name, args } => Some((name.as_str(), args)),
            ResponsePart::Text { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tools::FunctionDeclaration;

    #[test]
    fn test_validate_rejects_empty_contents() {
        let result = ChatRequest::default().validate();

        match result {
            Err(AdapterError::InvalidRequest { param, .. }) => {
                assert_eq!(param.as_deref(), Some("contents"));
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_tool_without_declarations() {
        let request = ChatRequest::builder()
            .user("hi")
            .tool(Tool::default())
            .build();

        match request.validate() {
            Err(AdapterError::InvalidRequest { param, .. }) => {
                assert_eq!(param.as_deref(), Some("tools[0]"));
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_preserves_order() {
        let request = ChatRequest::builder()
            .system("be brief")
            .user("hello")
            .model("hi")
            .tool(Tool::function(FunctionDeclaration::new(
                "get_current_time",
                "Returns the current time",
                serde_json::json!({"type": "object", "properties": {}}),
            )))
            .build();

        let roles: Vec<Role> = request.contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Model]);
        assert_eq!(request.tools().len(), 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_response_accessors() {
        let mut args = Map::new();
        args.insert("city".to_string(), Value::from("NY"));
        let response = ChatResponse::complete(vec![
            ResponsePart::Text {
                value: "Let me check. ".to_string(),
            },
            ResponsePart::FunctionCall {
                name: "get_weather".to_string(),
                args,
            },
        ]);

        assert_eq!(response.role, Role::Model);
        assert!(!response.partial);
        assert_eq!(response.text(), "Let me check. ");
        let calls: Vec<_> = response.function_calls().collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "get_weather");
        assert_eq!(calls[0].1["city"], "NY");
    }

    #[test]
    fn test_response_part_serialization_is_tagged() {
        let part = ResponsePart::Text {
            value: "Hello".to_string(),
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "value": "Hello"}));
    }
}
