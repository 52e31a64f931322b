//! Runner tests against a mocked chat-completions endpoint

use parlor_agent::prelude::*;
use parlor_agent::RunItem;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn completion(message: Value) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
}

fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

fn has_tool_result(request: &Request) -> bool {
    body_of(request)["messages"]
        .as_array()
        .map(|messages| messages.iter().any(|m| m["role"] == "tool"))
        .unwrap_or(false)
}

fn is_structured(request: &Request) -> bool {
    body_of(request).get("response_format").is_some()
}

fn model_for(server: &MockServer) -> Arc<dyn Model> {
    let client = Arc::new(ModelClient::new("test-key", format!("{}/v1beta/openai/", server.uri())));
    Arc::new(ChatCompletionsModel::new("gemini-2.0-flash", client))
}

fn add_tool() -> FunctionTool {
    FunctionTool::builder("add")
        .description("Add two numbers.")
        .schema(json!({
            "type": "object",
            "properties": { "a": {"type": "integer"}, "b": {"type": "integer"} },
            "required": ["a", "b"]
        }))
        .handler(|_ctx, args| {
            let a = args["a"].as_i64().unwrap_or_default();
            let b = args["b"].as_i64().unwrap_or_default();
            Ok((a + b).to_string())
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn tool_round_trip_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .and(|req: &Request| has_tool_result(req))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": "2 + 3 = 5"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(|req: &Request| !has_tool_result(req))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "add", "arguments": "{\"a\":2,\"b\":3}" }
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let agent = Agent::builder("Math Agent")
        .instructions("You are a smart math agent.")
        .model(model_for(&server))
        .tool(add_tool())
        .build();

    let result = Runner::run(&agent, "What is 2 + 3?", &RunConfig::default())
        .await
        .unwrap();

    assert_eq!(result.final_output, "2 + 3 = 5");
    assert_eq!(result.usage.requests, 2);
    assert_eq!(result.usage.total_tokens, 40);
    assert!(result.new_items.iter().any(|item| matches!(
        item,
        RunItem::ToolResult { content, .. } if content == "5"
    )));

    // The follow-up request replays the call and its result in API shape
    let requests = server.received_requests().await.unwrap();
    let follow_up = requests.iter().map(body_of).find(|b| {
        b["messages"]
            .as_array()
            .map(|m| m.iter().any(|m| m["role"] == "tool"))
            .unwrap_or(false)
    });
    let follow_up = follow_up.expect("follow-up request");
    let messages = follow_up["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[2]["tool_calls"][0]["function"]["name"], "add");
    assert_eq!(messages[3]["tool_call_id"], "call_1");
}

#[tokio::test]
async fn input_guardrail_blocks_before_main_agent_runs() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(|req: &Request| is_structured(req))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": "{\"is_safe\": false, \"reason\": \"Insulting language\"}"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(|req: &Request| !is_structured(req))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": "should never be shown"
        }))))
        .expect(0)
        .mount(&server)
        .await;

    let model = model_for(&server);
    let guard = ClassifierGuardrail::new(
        "NegativeLanguageGuard",
        "Check if the input contains offensive, rude, or negative language.",
        "is_safe",
        model.clone(),
    );
    let agent = Agent::builder("Bot Agent")
        .instructions("You are a smart customer support bot.")
        .model(model)
        .input_guardrail(guard)
        .build();

    let err = Runner::run(&agent, "you are useless", &RunConfig::default())
        .await
        .unwrap_err();

    match err {
        AgentError::InputGuardrailTripwireTriggered {
            guardrail,
            output_info,
        } => {
            assert_eq!(guardrail, "NegativeLanguageGuard");
            assert_eq!(output_info["reason"], "Insulting language");
        }
        other => panic!("expected input tripwire, got {other:?}"),
    }
}

#[tokio::test]
async fn api_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let agent = Agent::builder("FAQ bot").model(model_for(&server)).build();
    let err = Runner::run(&agent, "What is your name?", &RunConfig::default())
        .await
        .unwrap_err();

    match err {
        AgentError::ModelError(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("bad key"));
        }
        other => panic!("expected model error, got {other:?}"),
    }
}
