use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_body, CompletionRequest, Provider};
use crate::errors::IdeaError;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct Anthropic {
    model: String,
    api_key: String,
    api_base: String,
    client: Client,
}

impl Anthropic {
    pub fn new(model: String, api_key: String, api_base: Option<String>) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

#[async_trait]
impl Provider for Anthropic {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, IdeaError> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = MsgRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: req.temperature,
            system: &req.system,
            messages: vec![Msg { role: "user", content: &req.user }],
        };

        tracing::debug!(%url, model = %self.model, "anthropic: POST");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdeaError::UpstreamCall(format!("anthropic request failed: {e}")))?;
        let text = read_body(resp, "anthropic").await?;

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| IdeaError::UpstreamCall(format!("anthropic response parse error: {e}")))?;
        parsed
            .content
            .into_iter()
            .find(|b| b.r#type == "text" && !b.text.is_empty())
            .map(|b| b.text)
            .ok_or_else(|| IdeaError::UpstreamCall("anthropic: empty content".into()))
    }
}
