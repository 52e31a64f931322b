//! Integer arithmetic tools

use parlor_agent::tool::parse_args;
use parlor_agent::{AgentError, FunctionTool};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct Operands {
    a: i64,
    b: i64,
}

/// `None` when the sum does not fit in an `i64`
pub fn add(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}

pub fn subtract(a: i64, b: i64) -> Option<i64> {
    a.checked_sub(b)
}

pub fn multiply(a: i64, b: i64) -> Option<i64> {
    a.checked_mul(b)
}

fn operands_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": { "type": "integer" },
            "b": { "type": "integer" }
        },
        "required": ["a", "b"],
        "additionalProperties": false
    })
}

fn binary_tool(name: &str, description: &str, op: fn(i64, i64) -> Option<i64>) -> FunctionTool {
    let tool_name = name.to_string();
    FunctionTool::new(name, description, operands_schema(), move |_ctx, args| {
        let Operands { a, b } = parse_args(args)?;
        op(a, b)
            .map(|value| value.to_string())
            .ok_or_else(|| AgentError::tool(tool_name.as_str(), "integer overflow"))
    })
}

pub fn add_tool() -> FunctionTool {
    binary_tool("add", "Add two numbers.", add)
}

pub fn subtract_tool() -> FunctionTool {
    binary_tool("subtract", "Subtract the second number from the first.", subtract)
}

pub fn multiply_tool() -> FunctionTool {
    binary_tool("multiply", "Multiply two numbers.", multiply)
}
