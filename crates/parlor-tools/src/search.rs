//! Web search through the Tavily API

use async_trait::async_trait;
use parlor_agent::tool::parse_args;
use parlor_agent::{AgentError, RunContext, Tool};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const TOOL_NAME: &str = "web_search";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

pub struct WebSearchTool {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WebSearchTool {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Raw search results as JSON
    pub async fn search(&self, query: &str) -> Result<Value, AgentError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| AgentError::tool(TOOL_NAME, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::tool(
                TOOL_NAME,
                format!("search API error {status}: {body}"),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::tool(TOOL_NAME, format!("unexpected response: {e}")))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Web Search Provider"
    }

    fn json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, _ctx: &RunContext, args: &str) -> Result<String, AgentError> {
        let value: Value =
            serde_json::from_str(args).map_err(|e| AgentError::InvalidJson(e.to_string()))?;
        let SearchArgs { query } = parse_args(value)?;
        info!(query = %query, "web_search tool fired");
        Ok(self.search(&query).await?.to_string())
    }
}
