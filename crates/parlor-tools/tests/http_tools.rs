//! Weather and search tools against mocked HTTP services

use parlor_agent::{AgentError, RunContext, Tool};
use parlor_tools::{WeatherTool, WebSearchTool};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn weather_formats_current_conditions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "w-key"))
        .and(query_param("q", "Karachi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "Karachi" },
            "current": {
                "temp_c": 31.5,
                "condition": { "text": "Partly cloudy" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = WeatherTool::new(format!("{}/v1", server.uri()), "w-key");
    let out = tool
        .invoke(&RunContext::new(), r#"{"city": "Karachi"}"#)
        .await
        .unwrap();

    assert_eq!(out, "The Weather in Karachi is 31.5Celsius with Partly cloudy.");
}

#[tokio::test]
async fn weather_api_error_is_a_tool_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let tool = WeatherTool::new(server.uri(), "w-key");
    let err = tool
        .invoke(&RunContext::new(), r#"{"city": "Atlantis"}"#)
        .await
        .unwrap_err();

    match err {
        AgentError::ToolError { tool_name, message } => {
            assert_eq!(tool_name, "get_weather");
            assert!(message.contains("400"));
            assert!(message.contains("No matching location found."));
        }
        other => panic!("expected tool error, got {other:?}"),
    }
}

#[tokio::test]
async fn weather_malformed_body_is_a_tool_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "current": {} })))
        .mount(&server)
        .await;

    let tool = WeatherTool::new(server.uri(), "w-key");
    let err = tool.current("Lahore").await.unwrap_err();
    assert!(matches!(err, AgentError::ToolError { .. }));
}

#[tokio::test]
async fn search_posts_query_with_bearer_key() {
    let server = MockServer::start().await;

    let results = json!({
        "query": "rust 2024 edition",
        "results": [{ "title": "Rust 2024", "url": "https://blog.rust-lang.org", "content": "..." }]
    });

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("Authorization", "Bearer t-key"))
        .and(body_json(json!({ "query": "rust 2024 edition" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let tool = WebSearchTool::new(server.uri(), "t-key");
    let out = tool
        .invoke(&RunContext::new(), r#"{"query": "rust 2024 edition"}"#)
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, results);
}

#[tokio::test]
async fn search_unauthorized_is_a_tool_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let tool = WebSearchTool::new(server.uri(), "bad");
    let err = tool.search("anything").await.unwrap_err();
    assert!(err.to_string().contains("invalid api key"));
}
