use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::{IdeaError, Issue};
use crate::template::{fill_all_prompts, library, PromptBlock, Variables};
use crate::wire::{GenerationOptions, GenerationRequest};

/// Count used for flat (non-categorized) generation, whatever the caller asked for.
pub const DEFAULT_IDEA_COUNT: u32 = 5;

/// Sampling temperature for preferences-driven generation.
pub const PREFS_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for free-text generation.
pub const FREE_TEXT_TEMPERATURE: f32 = 0.9;

/// The JSON shape the LLM is told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedShape {
    /// `{ideas: [...]}`
    Ideas,
    /// `{categories: [{name, ideas}]}`
    Categories,
    /// `{categories: [{categoryName, ideas}], extraIdeas: [...]}`
    PrefsCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub shape: ExpectedShape,
    /// Idea count the request was compiled for, if one applies.
    pub count: Option<u32>,
}

pub struct PromptCompiler {
    blocks: Vec<PromptBlock>,
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::new(library::default_prompts())
    }
}

impl PromptCompiler {
    pub fn new(blocks: Vec<PromptBlock>) -> Self {
        Self { blocks }
    }

    /// Compile one request into a system/user prompt pair.
    pub fn compile(&self, req: &GenerationRequest) -> Result<CompiledPrompt, IdeaError> {
        match req {
            GenerationRequest::Prefs { prefs } => {
                let mut vars = base_vars();
                vars.insert("prefs".into(), Value::String(prefs.to_json()));
                let filled = fill_all_prompts(&self.blocks, &vars);
                Ok(CompiledPrompt {
                    system: system_prompt(&filled, library::FORMAT_PREFS)?,
                    user: block(&filled, library::PREFS_REQUEST)?.to_string(),
                    temperature: PREFS_TEMPERATURE,
                    shape: ExpectedShape::PrefsCategories,
                    count: None,
                })
            }
            GenerationRequest::Prompt { prompt, options } => {
                if prompt.trim().is_empty() {
                    return Err(IdeaError::RequestShape(vec![Issue::new(
                        "prompt",
                        "non-empty string",
                        "empty string",
                    )]));
                }
                let count = effective_count(options);
                let mut vars = base_vars();
                if let Some(c) = count {
                    vars.insert("count".into(), json!(c));
                    vars.insert("countRule".into(), json!(format!("Return {c} ideas in total across all categories.")));
                }
                let filled = fill_all_prompts(&self.blocks, &vars);
                let (format_id, shape) = if options.categorized {
                    (library::FORMAT_CATEGORIES, ExpectedShape::Categories)
                } else {
                    (library::FORMAT_IDEAS, ExpectedShape::Ideas)
                };
                Ok(CompiledPrompt {
                    system: system_prompt(&filled, format_id)?,
                    user: user_prompt(prompt, options, count),
                    temperature: FREE_TEXT_TEMPERATURE,
                    shape,
                    count,
                })
            }
        }
    }
}

fn system_prompt(filled: &[PromptBlock], format_id: &str) -> Result<String, IdeaError> {
    Ok(format!("{}\n\n{}", block(filled, library::PERSONA)?, block(filled, format_id)?))
}

fn base_vars() -> Variables {
    let mut vars = Variables::new();
    vars.insert("ideaSchema".into(), Value::String(library::idea_schema().to_string()));
    vars
}

fn block<'a>(blocks: &'a [PromptBlock], id: &str) -> Result<&'a str, IdeaError> {
    library::find(blocks, id).ok_or_else(|| {
        IdeaError::RequestShape(vec![Issue::new(format!("prompts.{id}"), "prompt block", "missing")])
    })
}

/// Flat lists always use the default count; categorized requests keep the caller's.
pub fn effective_count(options: &GenerationOptions) -> Option<u32> {
    if options.categorized {
        options.count
    } else {
        Some(DEFAULT_IDEA_COUNT)
    }
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The caller's text followed by one sentence per populated option, in a fixed order.
fn user_prompt(prompt: &str, options: &GenerationOptions, count: Option<u32>) -> String {
    let mut out = prompt.to_string();
    if let Some(p) = present(&options.platform) {
        out.push_str(&format!(" Target platform: {p}."));
    }
    if let Some(f) = present(&options.format) {
        out.push_str(&format!(" Content format: {f}."));
    }
    if let Some(t) = present(&options.tone) {
        out.push_str(&format!(" Tone: {t}."));
    }
    if let Some(a) = present(&options.audience) {
        out.push_str(&format!(" Target audience: {a}."));
    }
    if let Some(c) = count.filter(|c| *c != DEFAULT_IDEA_COUNT) {
        out.push_str(&format!(" Generate {c} ideas."));
    }
    out
}
