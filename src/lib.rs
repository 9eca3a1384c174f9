//! Content idea generation: prompt compilation, LLM dispatch, strict
//! response validation and favorite reconciliation.

pub mod cli;
pub mod config;
pub mod errors;
pub mod favorites;
pub mod generate;
pub mod log;
pub mod merge;
pub mod prefs;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod template;
pub mod ux;
pub mod validate;
pub mod wire;

pub use errors::{IdeaError, Issue};
pub use generate::IdeaGenerator;
pub use wire::{ContentCategory, ContentIdea, GenerationOptions, GenerationRequest, GenerationResult};
