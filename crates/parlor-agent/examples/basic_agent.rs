//! Basic agent example
//!
//! A math agent with a single `add` tool, talking to Gemini through its
//! OpenAI-compatible endpoint.
//!
//! Run with:
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run -p parlor-agent --example basic_agent
//! ```

use parlor_agent::prelude::*;
use parlor_agent::tool::parse_args;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
struct Operands {
    a: i64,
    b: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let add = FunctionTool::builder("add")
        .description("Add two numbers.")
        .schema(json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            },
            "required": ["a", "b"]
        }))
        .handler(|_ctx, args| {
            let Operands { a, b } = parse_args(args)?;
            Ok((a + b).to_string())
        })
        .build()?;

    let client = Arc::new(ModelClient::new(
        std::env::var("GEMINI_API_KEY")?,
        "https://generativelanguage.googleapis.com/v1beta/openai/",
    ));
    let model = Arc::new(ChatCompletionsModel::new("gemini-2.0-flash", client));

    let agent = Agent::builder("Math Agent")
        .instructions("You are a smart math agent. Use the provided tools to solve math questions when needed.")
        .model(model)
        .tool(add)
        .build();

    println!("Running agent...\n");
    let result = agent
        .run("What is 123 + 456?", &RunConfig::new().with_max_turns(5))
        .await?;

    println!("=== Results ===");
    println!("Final output: {}", result.final_output);
    println!("\nUsage:");
    println!("  Requests: {}", result.usage.requests);
    println!("  Total tokens: {}", result.usage.total_tokens);

    println!("\n=== Generated Items ===");
    for (i, item) in result.new_items.iter().enumerate() {
        println!("{}. {:?}", i + 1, item);
    }

    Ok(())
}
