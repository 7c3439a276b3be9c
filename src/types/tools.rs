//! Tool declarations supplied by the agent framework.

use serde::{Deserialize, Serialize};

/// Declaration of a function that the model can call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    /// The name of the function.
    pub name: String,
    /// The description of the function.
    pub description: String,
    /// JSON Schema for the function parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl FunctionDeclaration {
    /// Creates a function declaration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Some(parameters),
        }
    }
}

/// A tool offered to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Function declarations carried by this tool.
    #[serde(default)]
    pub function_declarations: Vec<FunctionDeclaration>,
}

impl Tool {
    /// Creates a tool carrying exactly one function declaration.
    pub fn function(declaration: FunctionDeclaration) -> Self {
        Self {
            function_declarations: vec![declaration],
        }
    }

    /// Returns the first function declaration, if any.
    pub fn primary_declaration(&self) -> Option<&FunctionDeclaration> {
        self.function_declarations.first()
    }
}
