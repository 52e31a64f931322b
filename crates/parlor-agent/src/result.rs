//! Result types for agent runs

use crate::errors::{AgentError, Result};
use crate::types::{InputItem, ModelResponse, RunItem, Usage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Result of an agent run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// The original input
    pub input: Vec<InputItem>,

    /// New items generated during the run
    pub new_items: Vec<RunItem>,

    /// Raw model responses
    pub raw_responses: Vec<ModelResponse>,

    /// The final output text (JSON text for structured-output agents)
    pub final_output: String,

    /// Name of the agent that produced the final output
    pub last_agent: String,

    /// Total usage statistics
    pub usage: Usage,
}

impl RunResult {
    /// Parse the final output as structured data
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.final_output).map_err(|e| {
            AgentError::ModelBehavior(format!(
                "Final output of {} is not valid structured output: {}",
                self.last_agent, e
            ))
        })
    }

    /// Convert the result back to a list of input items
    ///
    /// This merges the original input with all new items,
    /// useful for continuing a conversation.
    pub fn to_input_list(&self) -> Vec<InputItem> {
        let mut items = self.input.clone();
        items.extend(self.new_items.iter().filter_map(|item| item.to_input_item()));
        items
    }

    /// Get the last message content from the result
    pub fn last_message(&self) -> Option<&str> {
        self.new_items.iter().rev().find_map(|item| {
            if let RunItem::Message { content, .. } = item {
                Some(content.as_str())
            } else {
                None
            }
        })
    }

    /// Names of the agents control was handed to, in order
    pub fn handoffs(&self) -> Vec<&str> {
        self.new_items
            .iter()
            .filter_map(|item| match item {
                RunItem::Handoff { to, .. } => Some(to.as_str()),
                _ => None,
            })
            .collect()
    }
}
