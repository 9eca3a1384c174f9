use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub mod library;

/// Variables available to a template. Values are plain JSON so arrays,
/// objects, booleans and numbers all render through one path.
pub type Variables = Map<String, Value>;

/// One named block of prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBlock {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl PromptBlock {
    pub fn new(id: &str, name: &str, text: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string(), text: text.to_string() }
    }
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static token regex"))
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| render_value(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(obj @ Value::Object(_)) => obj.to_string(),
    }
}

/// Substitute every `{key}` token in `template`.
///
/// A key is an ASCII letter or `_` followed by ASCII letters, digits or `_`.
/// Other brace text such as `{1abc}`, `{brand-voice}` or `{ }` is not a
/// token and stays in the output literally.
///
/// Missing or null keys render as the empty string, arrays are joined with
/// `", "`, objects become compact JSON. Text without tokens comes back
/// unchanged.
pub fn fill_template(template: &str, variables: &Variables) -> String {
    token_re()
        .replace_all(template, |caps: &Captures| render_value(variables.get(&caps[1])))
        .into_owned()
}

/// Fill every block of `blocks`, keeping ids and order. The input is left untouched.
pub fn fill_all_prompts(blocks: &[PromptBlock], variables: &Variables) -> Vec<PromptBlock> {
    blocks
        .iter()
        .map(|b| PromptBlock {
            id: b.id.clone(),
            name: b.name.clone(),
            text: fill_template(&b.text, variables),
        })
        .collect()
}
