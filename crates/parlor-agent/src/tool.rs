//! Tool system for agents

use crate::context::RunContext;
use crate::errors::{AgentError, Result};
use crate::types::ToolSpec;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Tool trait for agent tools
///
/// Tools are functions that agents can call to perform actions.
/// They have a name, description, JSON schema, and an invoke method.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters
    fn json_schema(&self) -> Value;

    /// Invoke the tool with the given context and arguments
    ///
    /// # Arguments
    /// * `ctx` - The runtime context
    /// * `args` - JSON string containing the tool arguments
    ///
    /// # Returns
    /// The tool result as a string, or an error
    async fn invoke(&self, ctx: &RunContext, args: &str) -> Result<String>;

    /// The definition sent to the model
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.json_schema(),
        }
    }
}

/// Deserialize tool arguments into a typed struct
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| AgentError::InvalidJson(e.to_string()))
}

type Handler = Arc<dyn Fn(&RunContext, Value) -> Result<String> + Send + Sync>;

/// A function-based tool implementation
pub struct FunctionTool {
    name: String,
    description: String,
    json_schema: Value,
    handler: Handler,
}

impl FunctionTool {
    /// Create a new function tool
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        json_schema: Value,
        handler: impl Fn(&RunContext, Value) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            json_schema,
            handler: Arc::new(handler),
        }
    }

    /// Builder for creating function tools
    pub fn builder(name: impl Into<String>) -> FunctionToolBuilder {
        FunctionToolBuilder {
            name: name.into(),
            description: String::new(),
            json_schema: empty_object_schema(),
            handler: None,
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn json_schema(&self) -> Value {
        self.json_schema.clone()
    }

    async fn invoke(&self, ctx: &RunContext, args: &str) -> Result<String> {
        // Some providers send an empty string for parameterless calls
        let value: Value = if args.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(args).map_err(|e| AgentError::InvalidJson(e.to_string()))?
        };
        (self.handler)(ctx, value)
    }
}

/// Builder for FunctionTool
pub struct FunctionToolBuilder {
    name: String,
    description: String,
    json_schema: Value,
    handler: Option<Handler>,
}

impl FunctionToolBuilder {
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.json_schema = schema;
        self
    }

    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&RunContext, Value) -> Result<String> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    /// Build the function tool
    pub fn build(self) -> Result<FunctionTool> {
        let handler = self.handler.ok_or_else(|| {
            AgentError::Configuration(format!("Tool handler not set for {}", self.name))
        })?;

        Ok(FunctionTool {
            name: self.name,
            description: self.description,
            json_schema: self.json_schema,
            handler,
        })
    }
}

/// Schema for a tool that takes no arguments
pub fn empty_object_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "required": [],
        "additionalProperties": false
    })
}
