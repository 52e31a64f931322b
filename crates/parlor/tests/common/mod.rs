#![allow(dead_code)]

use async_trait::async_trait;
use parlor_agent::{AgentError, Model, ModelRequest, ModelResponse, RunItem};
use parlor_config::Settings;
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records each request
pub struct Scripted {
    responses: Mutex<Vec<ModelResponse>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl Scripted {
    pub fn new(mut responses: Vec<ModelResponse>) -> Arc<Self> {
        responses.reverse();
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Model for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get_response(&self, request: &ModelRequest) -> Result<ModelResponse, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AgentError::ModelError("script exhausted".to_string()))
    }
}

pub fn text(content: &str) -> ModelResponse {
    ModelResponse::text(content)
}

pub fn call(name: &str, arguments: &str) -> ModelResponse {
    ModelResponse {
        output: vec![RunItem::ToolCall {
            id: "call_0".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }],
        usage: Default::default(),
        id: None,
    }
}

pub fn verdict(field: &str, passed: bool, reason: &str) -> ModelResponse {
    ModelResponse::text(serde_json::json!({ field: passed, "reason": reason }).to_string())
}

/// Settings with every credential filled in
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.model.api_key = Some("g-key".to_string());
    settings.search.api_key = Some("t-key".to_string());
    settings.weather.api_key = Some("w-key".to_string());
    settings
}
