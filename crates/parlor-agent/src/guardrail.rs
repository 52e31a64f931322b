//! Input and output guardrails
//!
//! A guardrail inspects the user input (before the agent answers) or the final
//! output (before it is returned) and may trip a tripwire. A tripped guardrail
//! aborts the run with [`AgentError::InputGuardrailTripwireTriggered`] or
//! [`AgentError::OutputGuardrailTripwireTriggered`]; the agent output is never
//! returned to the caller.
//!
//! [`ClassifierGuardrail`] is the usual implementation: a nested agent that
//! answers a single yes/no question about the text as structured JSON.

use crate::agent::Agent;
use crate::context::RunContext;
use crate::errors::{AgentError, Result};
use crate::model::Model;
use crate::runner::{RunConfig, Runner};
use crate::types::OutputSchema;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a single guardrail check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailOutput {
    pub tripwire_triggered: bool,

    /// Free-form detail, typically the classifier's verdict
    pub output_info: Value,
}

impl GuardrailOutput {
    pub fn pass(output_info: Value) -> Self {
        Self {
            tripwire_triggered: false,
            output_info,
        }
    }

    pub fn trip(output_info: Value) -> Self {
        Self {
            tripwire_triggered: true,
            output_info,
        }
    }
}

/// Checks user input before the starting agent answers
#[async_trait]
pub trait InputGuardrail: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, ctx: &RunContext, agent: &Agent, input: &str) -> Result<GuardrailOutput>;
}

/// Checks the final output of the agent that produced it
#[async_trait]
pub trait OutputGuardrail: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, ctx: &RunContext, agent: &Agent, output: &str) -> Result<GuardrailOutput>;
}

/// Boolean verdict plus the classifier's explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub passed: bool,
    pub reason: String,
}

impl GuardrailVerdict {
    /// Read `{ <field>: bool, reason: string }`
    pub fn from_value(value: &Value, field: &str) -> Result<Self> {
        let passed = value.get(field).and_then(Value::as_bool).ok_or_else(|| {
            AgentError::ModelBehavior(format!("Guardrail verdict is missing boolean `{}`", field))
        })?;
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Self { passed, reason })
    }
}

/// Guardrail backed by a classification agent
///
/// The classifier must answer `{ <verdict_field>: bool, reason: string }`;
/// a `false` verdict trips the wire.
#[derive(Clone)]
pub struct ClassifierGuardrail {
    name: String,
    verdict_field: String,
    agent: Agent,
    config: RunConfig,
}

impl ClassifierGuardrail {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        verdict_field: impl Into<String>,
        model: Arc<dyn Model>,
    ) -> Self {
        let name = name.into();
        let verdict_field = verdict_field.into();
        let agent = Agent::builder(name.clone())
            .instructions(instructions.into())
            .model(model)
            .output_schema(OutputSchema::new(
                format!("{}_verdict", verdict_field),
                verdict_schema(&verdict_field),
            ))
            .build();

        Self {
            name,
            verdict_field,
            agent,
            config: RunConfig::default(),
        }
    }

    /// Run configuration for the nested classification run
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn verdict_field(&self) -> &str {
        &self.verdict_field
    }

    async fn classify(&self, ctx: &RunContext, text: &str) -> Result<GuardrailOutput> {
        let result =
            Box::pin(Runner::run_with_context(&self.agent, text, ctx.fork(), &self.config)).await?;
        let value: Value = result.final_output_as()?;
        let verdict = GuardrailVerdict::from_value(&value, &self.verdict_field)?;

        debug!(
            guardrail = %self.name,
            passed = verdict.passed,
            reason = %verdict.reason,
            "Guardrail verdict"
        );

        if verdict.passed {
            Ok(GuardrailOutput::pass(value))
        } else {
            Ok(GuardrailOutput::trip(value))
        }
    }
}

#[async_trait]
impl InputGuardrail for ClassifierGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, ctx: &RunContext, _agent: &Agent, input: &str) -> Result<GuardrailOutput> {
        self.classify(ctx, input).await
    }
}

#[async_trait]
impl OutputGuardrail for ClassifierGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, ctx: &RunContext, _agent: &Agent, output: &str) -> Result<GuardrailOutput> {
        self.classify(ctx, output).await
    }
}

/// JSON schema for a `{ <field>: bool, reason: string }` verdict
pub fn verdict_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            field: { "type": "boolean" },
            "reason": { "type": "string" }
        },
        "required": [field, "reason"],
        "additionalProperties": false
    })
}
