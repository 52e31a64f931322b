//! Handoffs: transferring a conversation to another agent
//!
//! A handoff is advertised to the model as a parameterless function tool.
//! Calling it switches the active agent; the new agent sees the whole
//! conversation so far.

use crate::agent::Agent;
use crate::tool::empty_object_schema;
use crate::types::ToolSpec;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Handoff {
    /// Name of the tool the model calls to transfer control
    pub tool_name: String,

    /// Tells the model when the transfer is appropriate
    pub description: String,

    pub agent: Arc<Agent>,
}

impl Handoff {
    /// Handoff with the default `transfer_to_<agent>` tool name
    pub fn new(agent: Agent) -> Self {
        let tool_name = default_tool_name(&agent.name);
        let mut description = format!("Handoff to the {} agent to handle the request.", agent.name);
        if let Some(extra) = &agent.handoff_description {
            description.push(' ');
            description.push_str(extra);
        }
        Self {
            tool_name,
            description,
            agent: Arc::new(agent),
        }
    }

    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.tool_name.clone(),
            description: self.description.clone(),
            parameters: empty_object_schema(),
        }
    }

    /// Tool result reported back to the model once control has moved
    pub fn transfer_message(&self) -> String {
        serde_json::json!({ "assistant": self.agent.name }).to_string()
    }
}

impl From<Agent> for Handoff {
    fn from(agent: Agent) -> Self {
        Handoff::new(agent)
    }
}

impl fmt::Debug for Handoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handoff")
            .field("tool_name", &self.tool_name)
            .field("agent", &self.agent.name)
            .finish()
    }
}

/// `Human Agent` -> `transfer_to_human_agent`
pub fn default_tool_name(agent_name: &str) -> String {
    let mut slug = String::with_capacity(agent_name.len());
    let mut last_underscore = true;
    for c in agent_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            slug.push('_');
            last_underscore = true;
        }
    }
    let slug = slug.trim_end_matches('_');
    format!("transfer_to_{}", slug)
}
