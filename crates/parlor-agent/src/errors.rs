//! Error types for the agent framework

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Max turns exceeded: {0}")]
    MaxTurnsExceeded(usize),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Tool error: {tool_name}: {message}")]
    ToolError { tool_name: String, message: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Model behavior error: {0}")]
    ModelBehavior(String),

    #[error("Agent configuration error: {0}")]
    Configuration(String),

    /// An input guardrail rejected the user input before the agent answered
    #[error("Input guardrail tripwire triggered: {guardrail}")]
    InputGuardrailTripwireTriggered { guardrail: String, output_info: Value },

    /// An output guardrail rejected the agent's final output
    #[error("Output guardrail tripwire triggered: {guardrail}")]
    OutputGuardrailTripwireTriggered { guardrail: String, output_info: Value },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

impl AgentError {
    /// Shorthand for a tool failure
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        AgentError::ToolError {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a guardrail tripwire (input or output)
    pub fn is_tripwire(&self) -> bool {
        matches!(
            self,
            AgentError::InputGuardrailTripwireTriggered { .. }
                | AgentError::OutputGuardrailTripwireTriggered { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
