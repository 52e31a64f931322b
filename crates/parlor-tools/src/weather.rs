//! Current weather via weatherapi.com

use async_trait::async_trait;
use parlor_agent::tool::parse_args;
use parlor_agent::{AgentError, RunContext, Tool};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Number, Value};
use tracing::debug;

const TOOL_NAME: &str = "get_weather";

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: Number,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

pub struct WeatherTool {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherTool {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }

    /// One sentence describing the current weather in `city`
    pub async fn current(&self, city: &str) -> Result<String, AgentError> {
        debug!(city, "Fetching current weather");
        let response = self
            .client
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| AgentError::tool(TOOL_NAME, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::tool(
                TOOL_NAME,
                format!("weather API error {status}: {body}"),
            ));
        }

        let data: CurrentResponse = response
            .json()
            .await
            .map_err(|e| AgentError::tool(TOOL_NAME, format!("unexpected response: {e}")))?;

        Ok(format!(
            "The Weather in {} is {}Celsius with {}.",
            city, data.current.temp_c, data.current.condition.text
        ))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get weather of any city"
    }

    fn json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "city": { "type": "string" } },
            "required": ["city"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, _ctx: &RunContext, args: &str) -> Result<String, AgentError> {
        let value: Value =
            serde_json::from_str(args).map_err(|e| AgentError::InvalidJson(e.to_string()))?;
        let WeatherArgs { city } = parse_args(value)?;
        self.current(&city).await
    }
}
