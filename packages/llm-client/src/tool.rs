//! Typed tools the model can invoke during a conversation.
//!
//! A tool declares its argument shape once as a Rust struct; the JSON schema
//! the completions API needs is derived from it with `schemars`. The agent
//! loop works with [`ErasedTool`] so tools of different types can share one
//! collection.

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A callable capability exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to request this tool.
    const NAME: &'static str;

    /// Argument shape, deserialized from the model's JSON arguments.
    type Args: DeserializeOwned + JsonSchema + Send;

    /// Output shape, serialized back into the transcript.
    type Output: Serialize + Send;

    type Error: std::error::Error + Send + Sync + 'static;

    /// One or two sentences telling the model when to use this tool.
    fn description(&self) -> &str;

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.description().to_string(),
            parameters: parameters_schema::<Self::Args>(),
        }
    }
}

/// JSON schema for a tool's argument struct, as a bare parameters object.
///
/// schemars emits `$schema` and `title` keys the completions API rejects;
/// they are stripped here.
fn parameters_schema<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("title");
    }
    value
}

/// Name, description, and parameter schema for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// The `tools` array entry the completions API expects.
    pub fn into_wire(self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Arguments as the JSON string the model produced.
    pub arguments: String,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

impl ToolCall {
    /// Decode one entry of an assistant message's `tool_calls` array.
    pub fn from_value(value: &Value) -> Option<Self> {
        let wire: WireToolCall = serde_json::from_value(value.clone()).ok()?;
        Some(Self {
            id: wire.id,
            name: wire.function.name,
            arguments: wire.function.arguments,
        })
    }

    pub fn parse_args<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// A tool call that could not be completed, with the tool named so the
/// failure is meaningful in a transcript.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("'{tool}' failed: {message}")]
    Failed { tool: String, message: String },

    #[error("'{tool}' produced unserializable output: {message}")]
    Output { tool: String, message: String },
}

/// Object-safe view of a [`Tool`], with JSON strings at both ends.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError>;
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError> {
        let args: T::Args =
            serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments {
                tool: T::NAME.to_string(),
                message: e.to_string(),
            })?;

        let output = self.call(args).await.map_err(|e| ToolError::Failed {
            tool: T::NAME.to_string(),
            message: e.to_string(),
        })?;

        serde_json::to_string(&output).map_err(|e| ToolError::Output {
            tool: T::NAME.to_string(),
            message: e.to_string(),
        })
    }
}
