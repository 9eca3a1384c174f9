#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

use ideagen::errors::IdeaError;
use ideagen::provider::{CompletionRequest, Provider};

/// Provider that replays one canned reply and records what it was sent.
pub struct ScriptedProvider {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { reply: Ok(text.into()), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing(msg: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { reply: Err(msg.into()), calls: Mutex::new(Vec::new()) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> CompletionRequest {
        self.calls.lock().last().cloned().expect("provider was never called")
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, IdeaError> {
        self.calls.lock().push(req.clone());
        self.reply.clone().map_err(IdeaError::UpstreamCall)
    }
}

pub fn five_ideas() -> Value {
    let ideas: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "id": i.to_string(),
                "title": format!("Idea {i}"),
                "description": format!("Carousel slide set {i}"),
                "isFavorite": false
            })
        })
        .collect();
    json!({ "ideas": ideas })
}
