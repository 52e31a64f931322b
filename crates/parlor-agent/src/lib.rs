//! Parlor agent framework
//!
//! Agents bundle instructions, a chat model, tools, guardrails and handoff
//! targets. The [`Runner`] drives the conversation against an
//! OpenAI-compatible chat-completions endpoint until the agent produces a
//! final answer.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use parlor_agent::{Agent, ChatCompletionsModel, ModelClient, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(ModelClient::new(
//!         std::env::var("GEMINI_API_KEY")?,
//!         "https://generativelanguage.googleapis.com/v1beta/openai/",
//!     ));
//!     let model = Arc::new(ChatCompletionsModel::new("gemini-2.0-flash", client));
//!
//!     let agent = Agent::builder("assistant")
//!         .instructions("You are a helpful assistant.")
//!         .model(model)
//!         .build();
//!
//!     let result = agent.run("Hello!", &RunConfig::default()).await?;
//!     println!("Response: {}", result.final_output);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod context;
pub mod errors;
pub mod guardrail;
pub mod handoff;
pub mod model;
pub mod result;
pub mod runner;
pub mod tool;
pub mod types;

pub use agent::{Agent, AgentBuilder, InstructionFn, Instructions};
pub use context::RunContext;
pub use errors::AgentError;
pub use guardrail::{
    ClassifierGuardrail, GuardrailOutput, GuardrailVerdict, InputGuardrail, OutputGuardrail,
};
pub use handoff::Handoff;
pub use model::{ChatCompletionsModel, Model, ModelClient, ModelRequest};
pub use result::RunResult;
pub use runner::{RunConfig, Runner};
pub use tool::{FunctionTool, Tool};
pub use types::{InputItem, ModelResponse, ModelSettings, OutputSchema, RunItem, ToolSpec};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::types::Usage;
    pub use crate::{
        Agent, AgentBuilder, AgentError, ChatCompletionsModel, ClassifierGuardrail, FunctionTool,
        Handoff, Model, ModelClient, RunConfig, RunContext, RunResult, Runner, Tool,
    };
}
