//! Core types for agent framework

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input item for the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputItem {
    #[serde(rename = "message")]
    Message { role: String, content: String },

    /// A tool call previously emitted by the assistant, replayed to the model
    #[serde(rename = "tool_call")]
    ToolCall {
        id: String,
        name: String,
        arguments: String,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

impl InputItem {
    /// Create a user message
    pub fn user_message(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant_message(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system_message(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Item generated during agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunItem {
    #[serde(rename = "message")]
    Message { role: String, content: String },

    #[serde(rename = "tool_call")]
    ToolCall {
        id: String,
        name: String,
        arguments: String,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        tool_call_id: String,
        content: String,
    },

    /// Control moved from one agent to another
    #[serde(rename = "handoff")]
    Handoff { from: String, to: String },
}

impl RunItem {
    /// Convert to input item for next turn
    ///
    /// Handoff markers are bookkeeping only and are not replayed to the model.
    pub fn to_input_item(&self) -> Option<InputItem> {
        match self {
            RunItem::Message { role, content } => Some(InputItem::Message {
                role: role.clone(),
                content: content.clone(),
            }),
            RunItem::ToolCall {
                id,
                name,
                arguments,
            } => Some(InputItem::ToolCall {
                id: id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            }),
            RunItem::ToolResult {
                tool_call_id,
                content,
            } => Some(InputItem::ToolResult {
                tool_call_id: tool_call_id.clone(),
                content: content.clone(),
            }),
            RunItem::Handoff { .. } => None,
        }
    }
}

/// Model response from LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The output items (messages, tool calls, etc.)
    pub output: Vec<RunItem>,

    /// Usage statistics
    pub usage: Usage,

    /// Response ID for reference
    pub id: Option<String>,
}

impl ModelResponse {
    /// A response carrying a single assistant text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            output: vec![RunItem::Message {
                role: "assistant".to_string(),
                content: content.into(),
            }],
            usage: Usage::default(),
            id: None,
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub requests: usize,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl Usage {
    /// Add usage from another instance
    pub fn add(&mut self, other: &Usage) {
        self.requests += other.requests;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Model settings for tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// `auto`, `required`, `none`, or a specific tool name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

impl ModelSettings {
    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn resolve(&self, other: Option<&ModelSettings>) -> ModelSettings {
        let Some(other) = other else {
            return self.clone();
        };
        ModelSettings {
            temperature: other.temperature.or(self.temperature),
            top_p: other.top_p.or(self.top_p),
            max_tokens: other.max_tokens.or(self.max_tokens),
            stop: other.stop.clone().or_else(|| self.stop.clone()),
            tool_choice: other.tool_choice.clone().or_else(|| self.tool_choice.clone()),
        }
    }
}

/// Function definition advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// JSON schema the agent's final output must conform to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}
