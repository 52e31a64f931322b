//! Model abstraction and the OpenAI-compatible chat-completions client

use crate::errors::{AgentError, Result};
use crate::types::{InputItem, ModelResponse, ModelSettings, OutputSchema, RunItem, ToolSpec, Usage};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Everything a model needs for one turn
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system_prompt: Option<String>,
    pub input: Vec<InputItem>,
    pub tools: Vec<ToolSpec>,
    pub settings: ModelSettings,
    pub output_schema: Option<OutputSchema>,
}

/// A hosted (or scripted) chat model
#[async_trait]
pub trait Model: Send + Sync {
    /// Model identifier, e.g. `gemini-2.0-flash`
    fn name(&self) -> &str;

    /// Produce one response for the given request
    async fn get_response(&self, request: &ModelRequest) -> Result<ModelResponse>;
}

/// Connection to an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ModelClient {
    api_base: String,
    api_key: String,
    http: reqwest::Client,
}

impl ModelClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Chat-completions model bound to a client
#[derive(Debug, Clone)]
pub struct ChatCompletionsModel {
    client: Arc<ModelClient>,
    model: String,
}

impl ChatCompletionsModel {
    pub fn new(model: impl Into<String>, client: Arc<ModelClient>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build the JSON request body
    pub fn request_body(&self, request: &ModelRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(prompt) = &request.system_prompt {
            messages.push(json!({"role": "system", "content": prompt}));
        }
        messages.extend(items_to_chat_messages(&request.input));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if !request.tools.is_empty() {
            let tools: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = json!(tools);

            if let Some(choice) = &request.settings.tool_choice {
                body["tool_choice"] = tool_choice_value(choice);
            }
        }

        let settings = &request.settings;
        if let Some(temp) = settings.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(top_p) = settings.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(max_tokens) = settings.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(stop) = &settings.stop {
            body["stop"] = json!(stop);
        }

        if let Some(schema) = &request.output_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true,
                }
            });
        }

        body
    }
}

#[async_trait]
impl Model for ChatCompletionsModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn get_response(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let body = self.request_body(request);

        debug!(model = %self.model, messages = request.input.len(), "Calling LLM");

        let response = self
            .client
            .http
            .post(self.client.completions_url())
            .header("Authorization", format!("Bearer {}", self.client.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::ModelError(format!(
                "LLM API error {}: {}",
                status, error_text
            )));
        }

        let response_json: Value = response.json().await?;
        debug!("LLM response: {:?}", response_json);

        parse_chat_response(response_json)
    }
}

fn tool_choice_value(choice: &str) -> Value {
    match choice {
        "auto" | "required" | "none" => json!(choice),
        name => json!({"type": "function", "function": {"name": name}}),
    }
}

/// Convert input items to chat-completions messages
///
/// Consecutive tool calls are folded into a single assistant message, which is
/// the shape the API expects ahead of the matching tool results.
pub fn items_to_chat_messages(items: &[InputItem]) -> Vec<Value> {
    let mut messages: Vec<Value> = Vec::new();
    let mut pending_calls: Vec<Value> = Vec::new();

    for item in items {
        if let InputItem::ToolCall {
            id,
            name,
            arguments,
        } = item
        {
            pending_calls.push(json!({
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": arguments},
            }));
            continue;
        }

        if !pending_calls.is_empty() {
            messages.push(assistant_tool_calls(std::mem::take(&mut pending_calls)));
        }

        match item {
            InputItem::Message { role, content } => {
                messages.push(json!({"role": role, "content": content}));
            }
            InputItem::ToolResult {
                tool_call_id,
                content,
            } => {
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": tool_call_id,
                    "content": content,
                }));
            }
            InputItem::ToolCall { .. } => {}
        }
    }

    if !pending_calls.is_empty() {
        messages.push(assistant_tool_calls(pending_calls));
    }

    messages
}

fn assistant_tool_calls(calls: Vec<Value>) -> Value {
    json!({"role": "assistant", "content": Value::Null, "tool_calls": calls})
}

/// Parse a chat-completions response into a ModelResponse
pub fn parse_chat_response(response: Value) -> Result<ModelResponse> {
    let choice = response["choices"]
        .get(0)
        .ok_or_else(|| AgentError::ModelBehavior("No choices in response".to_string()))?;

    let message = &choice["message"];
    let mut output = Vec::new();

    if let Some(content) = message["content"].as_str() {
        if !content.is_empty() {
            output.push(RunItem::Message {
                role: "assistant".to_string(),
                content: content.to_string(),
            });
        }
    }

    if let Some(tool_calls) = message["tool_calls"].as_array() {
        for (index, call) in tool_calls.iter().enumerate() {
            // Gemini's compatibility layer may leave ids blank
            let id = call["id"]
                .as_str()
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", index));
            let function = &call["function"];
            let name = function["name"]
                .as_str()
                .ok_or_else(|| AgentError::ModelBehavior("Missing tool name".to_string()))?;
            let args = match &function["arguments"] {
                Value::String(s) => s.clone(),
                Value::Null => "{}".to_string(),
                other => other.to_string(),
            };

            output.push(RunItem::ToolCall {
                id,
                name: name.to_string(),
                arguments: args,
            });
        }
    }

    let usage = if let Some(u) = response["usage"].as_object() {
        let field = |key: &str| u.get(key).and_then(Value::as_u64).unwrap_or(0) as usize;
        Usage {
            requests: 1,
            input_tokens: field("prompt_tokens"),
            output_tokens: field("completion_tokens"),
            total_tokens: field("total_tokens"),
        }
    } else {
        Usage {
            requests: 1,
            ..Usage::default()
        }
    };

    Ok(ModelResponse {
        output,
        usage,
        id: response["id"].as_str().map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ChatCompletionsModel {
        let client = Arc::new(ModelClient::new(
            "key",
            "https://generativelanguage.googleapis.com/v1beta/openai/",
        ));
        ChatCompletionsModel::new("gemini-2.0-flash", client)
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let client = ModelClient::new("k", "https://example.com/v1/");
        assert_eq!(client.completions_url(), "https://example.com/v1/chat/completions");
        let client = ModelClient::new("k", "https://example.com/v1");
        assert_eq!(client.completions_url(), "https://example.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_includes_tools_and_schema() {
        let request = ModelRequest {
            system_prompt: Some("Be brief.".to_string()),
            input: vec![InputItem::user_message("hi")],
            tools: vec![ToolSpec {
                name: "add".to_string(),
                description: "Add two numbers.".to_string(),
                parameters: json!({"type": "object"}),
            }],
            settings: ModelSettings {
                tool_choice: Some("auto".to_string()),
                temperature: Some(0.1),
                ..Default::default()
            },
            output_schema: Some(OutputSchema::new("verdict", json!({"type": "object"}))),
        };

        let body = model().request_body(&request);
        assert_eq!(body["model"], "gemini-2.0-flash");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["tools"][0]["function"]["name"], "add");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["response_format"]["json_schema"]["name"], "verdict");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_tool_choice_without_tools_is_omitted() {
        let request = ModelRequest {
            settings: ModelSettings {
                tool_choice: Some("auto".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(model().request_body(&request).get("tool_choice").is_none());
    }

    #[test]
    fn test_tool_calls_folded_into_assistant_message() {
        let items = vec![
            InputItem::user_message("2+3 and 4*5?"),
            InputItem::ToolCall {
                id: "a".to_string(),
                name: "add".to_string(),
                arguments: r#"{"a":2,"b":3}"#.to_string(),
            },
            InputItem::ToolCall {
                id: "b".to_string(),
                name: "multiply".to_string(),
                arguments: r#"{"a":4,"b":5}"#.to_string(),
            },
            InputItem::ToolResult {
                tool_call_id: "a".to_string(),
                content: "5".to_string(),
            },
            InputItem::ToolResult {
                tool_call_id: "b".to_string(),
                content: "20".to_string(),
            },
        ];

        let messages = items_to_chat_messages(&items);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["tool_calls"].as_array().unwrap().len(), 2);
        assert_eq!(messages[2]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "b");
    }

    #[test]
    fn test_parse_response_with_blank_tool_id() {
        let response = json!({
            "id": "chatcmpl-1",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"Karachi\"}"}
                    }]
                }
            }],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        });

        let parsed = parse_chat_response(response).unwrap();
        assert_eq!(parsed.usage.total_tokens, 10);
        assert_eq!(
            parsed.output,
            vec![RunItem::ToolCall {
                id: "call_0".to_string(),
                name: "get_weather".to_string(),
                arguments: "{\"city\":\"Karachi\"}".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_response_without_choices() {
        let err = parse_chat_response(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, AgentError::ModelBehavior(_)));
    }
}
