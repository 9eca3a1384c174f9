use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single structural problem found while checking untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self { path: path.into(), expected: expected.into(), actual: actual.into() }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, got {}", self.path, self.expected, self.actual)
    }
}

#[derive(Error, Debug)]
pub enum IdeaError {
    #[error("invalid request: {}", first_issue(.0))]
    RequestShape(Vec<Issue>),
    #[error("llm call failed: {0}")]
    UpstreamCall(String),
    #[error("llm completion is not valid JSON: {reason} (completion: {excerpt})")]
    MalformedCompletion { reason: String, excerpt: String },
    #[error("llm completion failed schema validation: {}", first_issue(.0))]
    SchemaValidation(Vec<Issue>),
    #[error("favorites store error: {0}")]
    Favorites(String),
}

fn first_issue(issues: &[Issue]) -> String {
    match issues.first() {
        Some(i) => i.to_string(),
        None => "unknown issue".to_string(),
    }
}

pub type Result<T, E = IdeaError> = std::result::Result<T, E>;

/// Cut a completion down for error messages without splitting a char.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
