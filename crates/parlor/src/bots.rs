//! The bot catalogue
//!
//! Each [`BotKind`] names one agent setup: its instructions, tools,
//! guardrails and handoffs, plus the fixed text its front ends show.
//! [`Bot::build`] checks the credentials the bot needs before anything talks
//! to the network.

use crate::error::Result;
use clap::ValueEnum;
use parlor_agent::{
    Agent, AgentError, ChatCompletionsModel, ClassifierGuardrail, Model, ModelClient,
    ModelSettings, RunConfig, RunContext, Runner,
};
use parlor_config::{Credential, Settings, DEFAULT_MODEL, GUARDED_MODEL};
use parlor_tools::{
    add_tool, hotel_info_tool, hotel_instructions, multiply_tool, order_status_tool,
    select_hotel, subtract_tool, WeatherTool, WebSearchTool, NO_HOTEL_INFO,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_PROMPT: &str = "Enter your question: ";

const FAQ_INSTRUCTIONS: &str = "You are a helpful FAQ bot. \
You must answer frequently asked questions such as: \
\"What is your name?\", \"What can you do?\", etc. \
Respond clearly and helpfully.";

const SUPPORT_INSTRUCTIONS: &str = "You are a smart customer support bot.
- Answer FAQs about products.
- Use get_order_status tool to fetch order status.
- If input looks complex or sentiment is negative, escalate to HumanAgent.";

const NEGATIVE_LANGUAGE_CHECK: &str = "Check if the input contains offensive, rude, or negative language. \
If yes, respond with is_safe=False and give reason. \
Otherwise respond with is_safe=True.";

const MATH_CHECK: &str = "Check and verify if input is related to math.";

const POLITICS_CHECK: &str = "Analyze the given output and determine if it contains any reference to politics, \
elections, or political figures (e.g., presidents, prime ministers, ministers, political parties). \
If any such reference exists, respond with is_safe=False and give a short reason. \
If not, respond with is_safe=True and a short reason.";

pub const OFFENSIVE_INPUT_BLOCKED: &str = "Input blocked: Offensive or unsafe language detected.";
pub const INVALID_PROMPT: &str = "Error: Invalid prompt (Input not allowed).";
pub const POLITICAL_OUTPUT_BLOCKED: &str =
    "Error: Response contains political content. Cannot display.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BotKind {
    /// Answers frequently asked questions
    Faq,
    /// Adds, subtracts and multiplies with tools
    Math,
    /// Current weather for a city
    Weather,
    /// Weather or addition
    Multi,
    /// Order status with an offensive-language guard and a human handoff
    Support,
    /// General assistant with web search
    Search,
    /// Math agent that rejects non-math input
    GuardedMath,
    /// General agent whose political answers are withheld
    GuardedGeneral,
    /// Booking assistant for the hotel named in the question
    Hotel,
}

impl BotKind {
    pub const ALL: [BotKind; 9] = [
        BotKind::Faq,
        BotKind::Math,
        BotKind::Weather,
        BotKind::Multi,
        BotKind::Support,
        BotKind::Search,
        BotKind::GuardedMath,
        BotKind::GuardedGeneral,
        BotKind::Hotel,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            BotKind::Faq => "faq",
            BotKind::Math => "math",
            BotKind::Weather => "weather",
            BotKind::Multi => "multi",
            BotKind::Support => "support",
            BotKind::Search => "search",
            BotKind::GuardedMath => "guarded-math",
            BotKind::GuardedGeneral => "guarded-general",
            BotKind::Hotel => "hotel",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            BotKind::Faq => "Answers frequently asked questions",
            BotKind::Math => "Math questions, solved with add/subtract/multiply tools",
            BotKind::Weather => "Current weather of any city",
            BotKind::Multi => "City weather or adding two numbers",
            BotKind::Support => "Order status, offensive-language guard, human handoff",
            BotKind::Search => "General assistant with web search",
            BotKind::GuardedMath => "Math agent that only accepts math questions",
            BotKind::GuardedGeneral => "General agent that withholds political answers",
            BotKind::Hotel => "Hotel booking assistant for a known hotel",
        }
    }

    /// First message of a chat session
    pub fn greeting(self) -> &'static str {
        match self {
            BotKind::Faq => "Welcome to my FAQ bot",
            BotKind::Math => "Hi! I'm a Math Bot. You can ask me math-related questions.",
            BotKind::Weather => {
                "Hi! I'm a Weather Bot. You can ask me weather information of any particular city."
            }
            BotKind::Multi => {
                "Hi! I'm a multi talented Bot. You can ask me about a city's weather or to add two numbers."
            }
            BotKind::Support => "Hi! I'm a support bot. Ask me about our products or your order.",
            BotKind::Search => "Hi! I'm a general assistant. I can search the web for you.",
            BotKind::GuardedMath => "Hi! I'm a math agent. Ask me a math question.",
            BotKind::GuardedGeneral => "Hi! I'm a helpful agent. Ask me anything.",
            BotKind::Hotel => "Hi! Ask me about marriott, pearl continental or serena hotel.",
        }
    }

    /// Shown while the bot works on an answer
    pub fn placeholder(self) -> &'static str {
        match self {
            BotKind::Faq => "let me think",
            BotKind::Math => "Let me calculate that...",
            BotKind::Weather => "Let me check...",
            BotKind::Multi => "wait...",
            _ => "Thinking...",
        }
    }

    /// Console prompt
    pub fn prompt(self) -> &'static str {
        match self {
            BotKind::Search => "Enter your query : ",
            _ => DEFAULT_PROMPT,
        }
    }

    /// Credentials that must be present before the bot is built
    pub fn credentials(self) -> &'static [Credential] {
        match self {
            BotKind::Weather | BotKind::Multi => &[Credential::Model, Credential::Weather],
            BotKind::Search => &[Credential::Model, Credential::Search],
            _ => &[Credential::Model],
        }
    }

    /// Model used when the settings do not name one
    pub fn default_model(self) -> &'static str {
        match self {
            BotKind::GuardedMath | BotKind::GuardedGeneral | BotKind::Hotel => GUARDED_MODEL,
            _ => DEFAULT_MODEL,
        }
    }

    /// Model this bot runs on under `settings`
    pub fn model_name(self, settings: &Settings) -> &str {
        settings.model.name_or(self.default_model())
    }

    /// Fixed reply for a guardrail trip this bot reports, if any
    pub fn blocked_message(self, err: &AgentError) -> Option<&'static str> {
        match (self, err) {
            (BotKind::Support, AgentError::InputGuardrailTripwireTriggered { .. }) => {
                Some(OFFENSIVE_INPUT_BLOCKED)
            }
            (
                BotKind::GuardedMath | BotKind::GuardedGeneral,
                AgentError::InputGuardrailTripwireTriggered { .. },
            ) => Some(INVALID_PROMPT),
            (BotKind::GuardedGeneral, AgentError::OutputGuardrailTripwireTriggered { .. }) => {
                Some(POLITICAL_OUTPUT_BLOCKED)
            }
            _ => None,
        }
    }

    fn present(self, final_output: String) -> String {
        match self {
            BotKind::GuardedGeneral => format!("Final Output: {}", final_output),
            _ => final_output,
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A ready-to-run bot
#[derive(Clone)]
pub struct Bot {
    kind: BotKind,
    agent: Agent,
    model: Arc<dyn Model>,
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("kind", &self.kind)
            .field("agent", &self.agent.name)
            .field("model", &self.model.name())
            .finish()
    }
}

impl Bot {
    /// Build a bot against the configured chat-completions endpoint
    pub fn build(kind: BotKind, settings: &Settings) -> Result<Self> {
        let api_key = settings.require(Credential::Model)?;
        let client = Arc::new(ModelClient::new(api_key, settings.model.base_url.as_str()));
        let model = Arc::new(ChatCompletionsModel::new(kind.model_name(settings), client));
        Self::with_model(kind, settings, model)
    }

    /// Build a bot around an existing model
    pub fn with_model(kind: BotKind, settings: &Settings, model: Arc<dyn Model>) -> Result<Self> {
        settings.require_all(kind.credentials())?;
        let agent = agent_for(kind, settings, &model)?;
        debug!(bot = %kind, agent = %agent.name, model = model.name(), "Built bot");
        Ok(Self { kind, agent, model })
    }

    pub fn kind(&self) -> BotKind {
        self.kind
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn greeting(&self) -> &'static str {
        self.kind.greeting()
    }

    pub fn placeholder(&self) -> &'static str {
        self.kind.placeholder()
    }

    pub fn prompt(&self) -> &'static str {
        self.kind.prompt()
    }

    /// Answer one user message
    ///
    /// Guardrail trips this bot knows about become their fixed reply; every
    /// other failure is returned as an error.
    pub async fn respond(&self, input: &str, config: &RunConfig) -> Result<String> {
        info!(bot = %self.kind, "Handling message");

        // The search agent has no model of its own
        let config = match (self.kind, &config.model) {
            (BotKind::Search, None) => config.clone().with_model(self.model.clone()),
            _ => config.clone(),
        };

        let outcome = match self.kind {
            BotKind::Hotel => {
                let input = input.to_lowercase();
                let Some(hotel) = select_hotel(&input) else {
                    debug!("No hotel matched the message");
                    return Ok(NO_HOTEL_INFO.to_string());
                };
                debug!(hotel = hotel.name, "Selected hotel");
                let ctx = RunContext::with_context(*hotel);
                Runner::run_with_context(&self.agent, input, ctx, &config).await
            }
            _ => Runner::run(&self.agent, input, &config).await,
        };

        match outcome {
            Ok(result) => Ok(self.kind.present(result.final_output)),
            Err(err) => match self.kind.blocked_message(&err) {
                Some(message) => {
                    info!(bot = %self.kind, error = %err, "Guardrail blocked the message");
                    Ok(message.to_string())
                }
                None => Err(err.into()),
            },
        }
    }
}

fn weather_tool(settings: &Settings) -> Result<WeatherTool> {
    let key = settings.require(Credential::Weather)?;
    Ok(WeatherTool::new(settings.weather.base_url.as_str(), key))
}

/// Guardrail classifier bounded by the configured turn limit
fn classifier(
    name: &str,
    instructions: &str,
    verdict_field: &str,
    settings: &Settings,
    model: &Arc<dyn Model>,
) -> ClassifierGuardrail {
    ClassifierGuardrail::new(name, instructions, verdict_field, model.clone())
        .with_config(RunConfig::default().with_max_turns(settings.max_turns))
}

fn agent_for(kind: BotKind, settings: &Settings, model: &Arc<dyn Model>) -> Result<Agent> {
    let agent = match kind {
        BotKind::Faq => Agent::builder("FAQ bot")
            .instructions(FAQ_INSTRUCTIONS)
            .model(model.clone())
            .build(),

        BotKind::Math => Agent::builder("Math Agent")
            .instructions(
                "You are a smart math agent. Use the provided tools to solve math questions when needed.",
            )
            .model(model.clone())
            .tool(add_tool())
            .tool(subtract_tool())
            .tool(multiply_tool())
            .build(),

        BotKind::Weather => Agent::builder("weather Agent")
            .instructions(
                "You are a weather agent. If the user asks for weather, call the `get_weather` function with the city name.",
            )
            .model(model.clone())
            .tool(weather_tool(settings)?)
            .build(),

        BotKind::Multi => Agent::builder("multi Agent")
            .instructions(
                "If the user asks for weather, call the `get_weather` function with the city name.\
                 If the user asks to add two numbers, call the `add` function.",
            )
            .model(model.clone())
            .tool(weather_tool(settings)?)
            .tool(add_tool())
            .build(),

        BotKind::Support => {
            let human = Agent::builder("Human Agent")
                .instructions(
                    "You are a helpful human support agent. Handle escalated queries with empathy.",
                )
                .model(model.clone())
                .build();

            Agent::builder("Bot Agent")
                .instructions(SUPPORT_INSTRUCTIONS)
                .model(model.clone())
                .tool(order_status_tool())
                .input_guardrail(classifier(
                    "NegativeLanguageGuard",
                    NEGATIVE_LANGUAGE_CHECK,
                    "is_safe",
                    settings,
                    model,
                ))
                .handoff(human)
                .model_settings(ModelSettings {
                    tool_choice: Some("auto".to_string()),
                    ..Default::default()
                })
                .build()
        }

        BotKind::Search => {
            let key = settings.require(Credential::Search)?;
            Agent::builder("General Assistant")
                .instructions("You are a general assistant.")
                .tool(WebSearchTool::new(settings.search.base_url.as_str(), key))
                .build()
        }

        BotKind::GuardedMath => Agent::builder("MathAgent")
            .instructions("You are a math agent.")
            .model(model.clone())
            .input_guardrail(classifier(
                "InputGuardrailAgent",
                MATH_CHECK,
                "is_math",
                settings,
                model,
            ))
            .build(),

        BotKind::GuardedGeneral => Agent::builder("GeneralAgent")
            .instructions("You are a helpful agent.")
            .model(model.clone())
            .output_guardrail(classifier(
                "OutputGuardrailAgent",
                POLITICS_CHECK,
                "is_safe",
                settings,
                model,
            ))
            .build(),

        BotKind::Hotel => Agent::builder("Hotel Assistant")
            .dynamic_instructions(hotel_instructions)
            .model(model.clone())
            .tool(hotel_info_tool())
            .build(),
    };

    Ok(agent)
}
