//! Agent execution runner

use crate::agent::Agent;
use crate::context::RunContext;
use crate::errors::{AgentError, Result};
use crate::handoff::Handoff;
use crate::model::{Model, ModelRequest};
use crate::result::RunResult;
use crate::types::{InputItem, ModelResponse, ModelSettings, RunItem};
use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default maximum turns for agent execution
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Configuration for agent run
#[derive(Clone)]
pub struct RunConfig {
    /// Maximum number of turns (LLM invocations)
    pub max_turns: usize,

    /// Model used for every agent in the run, overriding the agents' own
    pub model: Option<Arc<dyn Model>>,

    /// Global model settings override
    pub model_settings: Option<ModelSettings>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_max_turns(mut self, turns: usize) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn with_model_settings(mut self, settings: ModelSettings) -> Self {
        self.model_settings = Some(settings);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            model: None,
            model_settings: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("max_turns", &self.max_turns)
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field("model_settings", &self.model_settings)
            .finish()
    }
}

/// Runner executes the agent loop
pub struct Runner;

impl Runner {
    /// Run the agent with the given input and an empty context
    pub async fn run(agent: &Agent, input: impl Into<String>, config: &RunConfig) -> Result<RunResult> {
        Self::run_with_context(agent, input, RunContext::new(), config).await
    }

    /// Run the agent with the given input and context
    ///
    /// This executes the agent loop:
    /// 1. Check the starting agent's input guardrails
    /// 2. Send input to LLM
    /// 3. If tool calls are returned, execute them and go again
    /// 4. If a handoff is requested, switch agents and go again
    /// 5. If a final output is returned, check output guardrails and complete
    /// 6. Fail once max_turns is exceeded
    pub async fn run_with_context(
        agent: &Agent,
        input: impl Into<String>,
        mut ctx: RunContext,
        config: &RunConfig,
    ) -> Result<RunResult> {
        let input = input.into();
        let mut current_agent = agent.clone();
        let mut turn = 0;
        let original_input = vec![InputItem::user_message(input.clone())];
        let mut generated_items: Vec<RunItem> = Vec::new();
        let mut model_responses: Vec<ModelResponse> = Vec::new();

        info!(agent = %agent.name, "Starting agent run");

        Self::check_input_guardrails(&current_agent, &ctx, &input).await?;

        loop {
            turn += 1;
            if turn > config.max_turns {
                warn!("Max turns ({}) exceeded", config.max_turns);
                return Err(AgentError::MaxTurnsExceeded(config.max_turns));
            }

            debug!("Turn {}: Running agent {}", turn, current_agent.name);

            let model = Self::resolve_model(&current_agent, config)?;

            let mut messages = original_input.clone();
            messages.extend(generated_items.iter().filter_map(|item| item.to_input_item()));

            let request = Self::build_request(&current_agent, &ctx, messages, config);
            let response = model.get_response(&request).await?;

            model_responses.push(response.clone());
            ctx.add_usage(&response.usage);

            let (next_step, new_items) =
                Self::process_response(&current_agent, response, &ctx).await?;

            generated_items.extend(new_items);

            match next_step {
                NextStep::FinalOutput(output) => {
                    Self::check_output_guardrails(&current_agent, &ctx, &output).await?;
                    info!(agent = %current_agent.name, turns = turn, "Agent completed with output");
                    return Ok(RunResult {
                        input: original_input,
                        new_items: generated_items,
                        raw_responses: model_responses,
                        final_output: output,
                        last_agent: current_agent.name.clone(),
                        usage: ctx.usage().clone(),
                    });
                }
                NextStep::RunAgain => {
                    debug!("Continuing agent loop (tools executed)");
                    continue;
                }
                NextStep::Handoff(handoff) => {
                    info!(from = %current_agent.name, to = %handoff.agent.name, "Handing off");
                    current_agent = handoff.agent.as_ref().clone();
                }
            }
        }
    }

    fn resolve_model(agent: &Agent, config: &RunConfig) -> Result<Arc<dyn Model>> {
        config
            .model
            .clone()
            .or_else(|| agent.model.clone())
            .ok_or_else(|| {
                AgentError::Configuration(format!("No model configured for agent {}", agent.name))
            })
    }

    fn build_request(
        agent: &Agent,
        ctx: &RunContext,
        input: Vec<InputItem>,
        config: &RunConfig,
    ) -> ModelRequest {
        let mut tools: Vec<_> = agent.tools.iter().map(|t| t.spec()).collect();
        tools.extend(agent.handoffs.iter().map(Handoff::spec));

        ModelRequest {
            system_prompt: agent.system_prompt(ctx),
            input,
            tools,
            settings: agent.model_settings.resolve(config.model_settings.as_ref()),
            output_schema: agent.output_schema.clone(),
        }
    }

    async fn check_input_guardrails(agent: &Agent, ctx: &RunContext, input: &str) -> Result<()> {
        if agent.input_guardrails.is_empty() {
            return Ok(());
        }

        debug!(count = agent.input_guardrails.len(), "Running input guardrails");
        let outputs = try_join_all(
            agent
                .input_guardrails
                .iter()
                .map(|g| g.check(ctx, agent, input)),
        )
        .await?;

        for (guardrail, output) in agent.input_guardrails.iter().zip(outputs) {
            if output.tripwire_triggered {
                warn!(guardrail = guardrail.name(), "Input guardrail tripwire triggered");
                return Err(AgentError::InputGuardrailTripwireTriggered {
                    guardrail: guardrail.name().to_string(),
                    output_info: output.output_info,
                });
            }
        }
        Ok(())
    }

    async fn check_output_guardrails(agent: &Agent, ctx: &RunContext, output: &str) -> Result<()> {
        if agent.output_guardrails.is_empty() {
            return Ok(());
        }

        debug!(count = agent.output_guardrails.len(), "Running output guardrails");
        let outputs = try_join_all(
            agent
                .output_guardrails
                .iter()
                .map(|g| g.check(ctx, agent, output)),
        )
        .await?;

        for (guardrail, result) in agent.output_guardrails.iter().zip(outputs) {
            if result.tripwire_triggered {
                warn!(guardrail = guardrail.name(), "Output guardrail tripwire triggered");
                return Err(AgentError::OutputGuardrailTripwireTriggered {
                    guardrail: guardrail.name().to_string(),
                    output_info: result.output_info,
                });
            }
        }
        Ok(())
    }

    /// Process the model response
    async fn process_response(
        agent: &Agent,
        response: ModelResponse,
        ctx: &RunContext,
    ) -> Result<(NextStep, Vec<RunItem>)> {
        let mut new_items = Vec::new();

        let tool_calls: Vec<_> = response
            .output
            .iter()
            .filter_map(|item| {
                if let RunItem::ToolCall {
                    id,
                    name,
                    arguments,
                } = item
                {
                    Some((id.clone(), name.clone(), arguments.clone()))
                } else {
                    None
                }
            })
            .collect();

        if !tool_calls.is_empty() {
            debug!("Executing {} tool calls", tool_calls.len());

            for (id, name, args) in &tool_calls {
                new_items.push(RunItem::ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    arguments: args.clone(),
                });
            }

            let mut handoff: Option<Handoff> = None;

            for (id, name, args) in tool_calls {
                if let Some(target) = agent.handoff(&name) {
                    let content = if handoff.is_some() {
                        "Multiple handoffs detected, ignoring this one.".to_string()
                    } else {
                        handoff = Some(target.clone());
                        target.transfer_message()
                    };
                    new_items.push(RunItem::ToolResult {
                        tool_call_id: id,
                        content,
                    });
                    continue;
                }

                let tool = agent.tool(&name).ok_or_else(|| {
                    AgentError::ModelBehavior(format!(
                        "Tool {} not found in agent {}",
                        name, agent.name
                    ))
                })?;

                debug!("Invoking tool: {}", name);
                let content = match tool.invoke(ctx, &args).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(tool = %name, error = %e, "Tool failed");
                        format!(
                            "An error occurred while running the tool. Please try again. Error: {}",
                            e
                        )
                    }
                };

                new_items.push(RunItem::ToolResult {
                    tool_call_id: id,
                    content,
                });
            }

            if let Some(target) = handoff {
                new_items.push(RunItem::Handoff {
                    from: agent.name.clone(),
                    to: target.agent.name.clone(),
                });
                return Ok((NextStep::Handoff(target), new_items));
            }

            return Ok((NextStep::RunAgain, new_items));
        }

        for item in &response.output {
            if let RunItem::Message { content, .. } = item {
                if agent.output_schema.is_some() {
                    serde_json::from_str::<serde_json::Value>(content).map_err(|e| {
                        AgentError::ModelBehavior(format!(
                            "Agent {} returned invalid structured output: {}",
                            agent.name, e
                        ))
                    })?;
                }
                new_items.push(item.clone());
                return Ok((NextStep::FinalOutput(content.clone()), new_items));
            }
        }

        Err(AgentError::ModelBehavior(
            "Model produced no tool calls or text output".to_string(),
        ))
    }
}

/// Next step in the agent loop
#[derive(Debug)]
enum NextStep {
    /// Agent produced final output
    FinalOutput(String),

    /// Run the agent again (after tool execution)
    RunAgain,

    /// Continue the conversation with another agent
    Handoff(Handoff),
}
