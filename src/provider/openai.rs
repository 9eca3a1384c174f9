use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{read_body, CompletionRequest, Provider};
use crate::errors::IdeaError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// OpenAI-compatible chat completions with JSON-object response mode.
pub struct OpenAIProvider {
    model: String,
    api_key: String,
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(model: String, api_key: String, api_base: Option<String>) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, IdeaError> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.user }
            ],
            "temperature": req.temperature,
            "response_format": { "type": "json_object" }
        });

        tracing::debug!(%url, model = %self.model, "openai: POST");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdeaError::UpstreamCall(format!("openai request failed: {e}")))?;
        let text = read_body(resp, "openai").await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| IdeaError::UpstreamCall(format!("openai response parse error: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IdeaError::UpstreamCall("openai: empty completion".into()))
    }
}
