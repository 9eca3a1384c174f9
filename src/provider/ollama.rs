use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_body, CompletionRequest, Provider};
use crate::errors::IdeaError;

pub const DEFAULT_URL: &str = "http://localhost:11434";

pub struct Ollama {
    model: String,
    url: String,
    client: Client,
}

impl Ollama {
    pub fn new(model: String, url: Option<String>) -> Self {
        Self {
            model,
            url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, IdeaError> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Msg { role: "system", content: &req.system },
                Msg { role: "user", content: &req.user },
            ],
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: req.temperature },
        };

        tracing::debug!(%url, model = %self.model, "ollama: POST");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdeaError::UpstreamCall(format!("ollama request failed: {e}")))?;
        let text = read_body(resp, "ollama").await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| IdeaError::UpstreamCall(format!("ollama response parse error: {e}")))?;
        Some(parsed.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IdeaError::UpstreamCall("ollama: empty completion".into()))
    }
}
