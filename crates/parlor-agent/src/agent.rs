//! Agent implementation

use crate::context::RunContext;
use crate::errors::Result;
use crate::guardrail::{InputGuardrail, OutputGuardrail};
use crate::handoff::Handoff;
use crate::model::Model;
use crate::result::RunResult;
use crate::runner::{RunConfig, Runner};
use crate::tool::Tool;
use crate::types::{ModelSettings, OutputSchema};
use std::fmt;
use std::sync::Arc;

/// Instructions computed from the run context at call time
///
/// A plain function pointer: it cannot capture state, so one agent can serve
/// many contexts at once without sharing anything mutable.
pub type InstructionFn = fn(&RunContext, &Agent) -> String;

/// Instructions for the agent (system prompt)
#[derive(Clone)]
pub enum Instructions {
    Static(String),

    /// Resolved against the run context each turn
    Dynamic(InstructionFn),
}

impl Instructions {
    /// Render the instructions for the given context
    pub fn render(&self, ctx: &RunContext, agent: &Agent) -> String {
        match self {
            Instructions::Static(s) => s.clone(),
            Instructions::Dynamic(f) => f(ctx, agent),
        }
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instructions::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Instructions::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<String> for Instructions {
    fn from(s: String) -> Self {
        Instructions::Static(s)
    }
}

impl From<&str> for Instructions {
    fn from(s: &str) -> Self {
        Instructions::Static(s.to_string())
    }
}

impl From<InstructionFn> for Instructions {
    fn from(f: InstructionFn) -> Self {
        Instructions::Dynamic(f)
    }
}

/// An AI agent configured with instructions, tools, and settings
///
/// Agents are the core abstraction for building chat bots. They bundle a
/// model, system prompt (instructions), tools, guardrails and handoff targets.
/// An agent is immutable once built; use [`Agent::clone_with`] to derive a
/// variant.
#[derive(Clone)]
pub struct Agent {
    pub name: String,

    pub instructions: Option<Instructions>,

    /// The model to use; a model set on the [`RunConfig`] takes precedence
    pub model: Option<Arc<dyn Model>>,

    pub tools: Vec<Arc<dyn Tool>>,

    /// Agents this agent may transfer the conversation to
    pub handoffs: Vec<Handoff>,

    pub input_guardrails: Vec<Arc<dyn InputGuardrail>>,

    pub output_guardrails: Vec<Arc<dyn OutputGuardrail>>,

    pub model_settings: ModelSettings,

    /// Description for when this agent is used as a handoff
    pub handoff_description: Option<String>,

    /// When set, the final output must be JSON matching this schema
    pub output_schema: Option<OutputSchema>,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        AgentBuilder::new(name).build()
    }

    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    /// Clone the agent with modifications
    pub fn clone_with(&self) -> AgentBuilder {
        AgentBuilder {
            agent: self.clone(),
        }
    }

    /// Get the system prompt for the agent in the given context
    pub fn system_prompt(&self, ctx: &RunContext) -> Option<String> {
        self.instructions.as_ref().map(|i| i.render(ctx, self))
    }

    /// Run the agent with the given input
    ///
    /// For a typed context, use [`Runner::run_with_context`] directly.
    pub async fn run(&self, input: impl Into<String>, config: &RunConfig) -> Result<RunResult> {
        Runner::run(self, input, config).await
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn with_handoff(mut self, agent: Agent) -> Self {
        self.handoffs.push(Handoff::new(agent));
        self
    }

    /// Find a tool by name
    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Find a handoff by its tool name
    pub fn handoff(&self, tool_name: &str) -> Option<&Handoff> {
        self.handoffs.iter().find(|h| h.tool_name == tool_name)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field("tools", &self.tools.len())
            .field("handoffs", &self.handoffs.len())
            .field("input_guardrails", &self.input_guardrails.len())
            .field("output_guardrails", &self.output_guardrails.len())
            .finish()
    }
}

/// Builder for creating agents
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            agent: Agent {
                name: name.into(),
                instructions: None,
                model: None,
                tools: Vec::new(),
                handoffs: Vec::new(),
                input_guardrails: Vec::new(),
                output_guardrails: Vec::new(),
                model_settings: ModelSettings::default(),
                handoff_description: None,
                output_schema: None,
            },
        }
    }

    pub fn instructions(mut self, instructions: impl Into<Instructions>) -> Self {
        self.agent.instructions = Some(instructions.into());
        self
    }

    /// Compute instructions from the run context on every turn
    pub fn dynamic_instructions(mut self, f: InstructionFn) -> Self {
        self.agent.instructions = Some(Instructions::Dynamic(f));
        self
    }

    pub fn model(mut self, model: Arc<dyn Model>) -> Self {
        self.agent.model = Some(model);
        self
    }

    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.agent.tools.push(Arc::new(tool));
        self
    }

    pub fn tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.agent.tools.extend(tools);
        self
    }

    pub fn handoff(mut self, handoff: impl Into<Handoff>) -> Self {
        self.agent.handoffs.push(handoff.into());
        self
    }

    pub fn input_guardrail(mut self, guardrail: impl InputGuardrail + 'static) -> Self {
        self.agent.input_guardrails.push(Arc::new(guardrail));
        self
    }

    pub fn output_guardrail(mut self, guardrail: impl OutputGuardrail + 'static) -> Self {
        self.agent.output_guardrails.push(Arc::new(guardrail));
        self
    }

    pub fn model_settings(mut self, settings: ModelSettings) -> Self {
        self.agent.model_settings = settings;
        self
    }

    pub fn handoff_description(mut self, desc: impl Into<String>) -> Self {
        self.agent.handoff_description = Some(desc.into());
        self
    }

    /// Require structured JSON output matching `schema`
    pub fn output_schema(mut self, schema: OutputSchema) -> Self {
        self.agent.output_schema = Some(schema);
        self
    }

    pub fn build(self) -> Agent {
        self.agent
    }
}
