use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::errors::IdeaError;

pub mod anthropic;
pub mod ollama;
pub mod openai;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| anyhow!("unknown provider {s:?}"))
    }
}

/// One chat completion: a system prompt, a user prompt and a temperature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// An LLM chat-completion backend. Returns the completion text as-is.
#[async_trait]
pub trait Provider: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, req: &CompletionRequest) -> Result<String, IdeaError>;
}

pub type DynProvider = Arc<dyn Provider>;

fn env_key(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("{name} env var is not set"))
}

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let base = cfg.api_base.clone();
    let model = cfg.model.clone();
    match cfg.provider {
        ProviderKind::OpenAI => Ok(Arc::new(openai::OpenAIProvider::new(
            model,
            env_key("OPENAI_API_KEY")?,
            base,
        ))),
        ProviderKind::Anthropic => Ok(Arc::new(anthropic::Anthropic::new(
            model,
            env_key("ANTHROPIC_API_KEY")?,
            base,
        ))),
        ProviderKind::Ollama => Ok(Arc::new(ollama::Ollama::new(model, base))),
    }
}

/// Read a response body and turn non-2xx statuses into upstream errors.
pub(crate) async fn read_body(resp: reqwest::Response, who: &str) -> Result<String, IdeaError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| IdeaError::UpstreamCall(format!("{who} read body failed: {e}")))?;
    if !status.is_success() {
        return Err(IdeaError::UpstreamCall(format!(
            "{who} API error ({status}): {}",
            crate::errors::excerpt(&text, 400)
        )));
    }
    Ok(text)
}
