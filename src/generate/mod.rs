//! The generation pipeline: compile, complete, parse once, validate.

use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

use crate::errors::{excerpt, IdeaError};
use crate::prompt::{CompiledPrompt, PromptCompiler};
use crate::provider::{CompletionRequest, DynProvider};
use crate::validate::{validate, IdGenerator};
use crate::wire::{GenerationRequest, GenerationResult};

/// Longest slice of a bad completion carried in the error.
pub const EXCERPT_CHARS: usize = 400;

pub struct IdeaGenerator {
    provider: DynProvider,
    compiler: PromptCompiler,
    ids: IdGenerator,
    transcript_root: Option<PathBuf>,
}

impl IdeaGenerator {
    pub fn new(provider: DynProvider) -> Self {
        Self {
            provider,
            compiler: PromptCompiler::default(),
            ids: IdGenerator::new(),
            transcript_root: None,
        }
    }

    /// Save each prompt and raw completion under `root/.ideagen/tx/<uuid>/`.
    pub fn with_transcripts(mut self, root: impl Into<PathBuf>) -> Self {
        self.transcript_root = Some(root.into());
        self
    }

    pub fn compile(&self, req: &GenerationRequest) -> Result<CompiledPrompt, IdeaError> {
        self.compiler.compile(req)
    }

    /// Run one request end to end. Every failure is terminal; nothing is retried.
    pub async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResult, IdeaError> {
        let compiled = self.compile(req)?;
        tracing::info!(
            shape = ?compiled.shape,
            count = ?compiled.count,
            temperature = compiled.temperature,
            model = self.provider.model(),
            "dispatching generation"
        );
        tracing::debug!(system = %compiled.system, user = %compiled.user, "compiled prompt");

        let completion = self
            .provider
            .complete(&CompletionRequest {
                system: compiled.system.clone(),
                user: compiled.user.clone(),
                temperature: compiled.temperature,
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "llm call failed"))?;
        tracing::debug!(bytes = completion.len(), "completion received");

        if let Some(root) = &self.transcript_root {
            let tx = Uuid::new_v4();
            match crate::log::save_transcript(root, tx, self.provider.model(), &compiled, &completion) {
                Ok(saved) => tracing::debug!(dir = %saved.dir.display(), "transcript saved"),
                Err(e) => tracing::warn!(error = %e, "failed to save transcript"),
            }
        }

        let value: Value = serde_json::from_str(&completion).map_err(|e| {
            tracing::warn!(error = %e, "completion is not JSON");
            IdeaError::MalformedCompletion {
                reason: e.to_string(),
                excerpt: excerpt(&completion, EXCERPT_CHARS),
            }
        })?;

        let result = validate(&value, compiled.shape, &self.ids)
            .inspect_err(|e| tracing::warn!(error = %e, "completion rejected"))?;
        tracing::info!(ideas = result.ideas().len(), "generation validated");
        Ok(result)
    }
}
