//! Built-in prompt blocks used by the prompt compiler.

use super::PromptBlock;

pub const PERSONA: &str = "persona";
pub const FORMAT_IDEAS: &str = "format.ideas";
pub const FORMAT_CATEGORIES: &str = "format.categories";
pub const FORMAT_PREFS: &str = "format.prefs";
pub const PREFS_REQUEST: &str = "request.prefs";

const PERSONA_TEXT: &str = "You are a senior social media strategist who writes short-form content ideas \
for small businesses and creators. Ideas must be specific, actionable and realistic to produce \
with a phone and a free editing app.";

const IDEA_SCHEMA_TEXT: &str = r#"Each idea is an object with these fields:
  "id": string, unique within your response
  "title": string, under 80 characters
  "description": string, 1-3 sentences
  "isFavorite": false
Optional fields (omit any you cannot fill):
  "format": string, "platform": string, "tags": [string],
  "estimatedEngagement": string, "difficulty": "easy" | "medium" | "hard",
  "timeToCreate": string, "bestTimeToPost": string, "targetAudience": string,
  "variations": [string]
Do not add any other fields."#;

const FORMAT_IDEAS_TEXT: &str = r#"Return exactly {count} ideas as a single JSON object of this shape:
{"ideas": [ <idea>, ... ]}

{ideaSchema}

Respond with the JSON object only. No markdown, no code fences, no text before or after it."#;

const FORMAT_CATEGORIES_TEXT: &str = r#"Group your ideas into distinct categories and return a single JSON object of this shape:
{"categories": [ {"name": string, "ideas": [ <idea>, ... ]}, ... ]}
{countRule}
Category names must be unique and non-empty.

{ideaSchema}

Respond with the JSON object only. No markdown, no code fences, no text before or after it."#;

const FORMAT_PREFS_TEXT: &str = r#"Use the business preferences you are given to propose content. Return a single JSON object of this shape:
{"categories": [ {"categoryName": string, "ideas": [ <idea>, ... ]}, ... ], "extraIdeas": [ <idea>, ... ]}
Category names must be unique and non-empty. "extraIdeas" holds ideas that fit no category and may be empty.

{ideaSchema}

You MUST NOT write anything outside this JSON object."#;

const PREFS_REQUEST_TEXT: &str = "Generate content ideas for this business. Match the brand voice, \
favour the enabled platforms and preferred formats, and avoid anything the brand lists as off-limits.\n\n\
Preferences (JSON):\n{prefs}";

/// The ordered default prompt set. `{ideaSchema}` is itself filled from
/// [`idea_schema`] by the compiler.
pub fn default_prompts() -> Vec<PromptBlock> {
    vec![
        PromptBlock::new(PERSONA, "Persona", PERSONA_TEXT),
        PromptBlock::new(FORMAT_IDEAS, "Flat idea list format", FORMAT_IDEAS_TEXT),
        PromptBlock::new(FORMAT_CATEGORIES, "Categorized format", FORMAT_CATEGORIES_TEXT),
        PromptBlock::new(FORMAT_PREFS, "Preferences format", FORMAT_PREFS_TEXT),
        PromptBlock::new(PREFS_REQUEST, "Preferences request", PREFS_REQUEST_TEXT),
    ]
}

pub fn idea_schema() -> &'static str {
    IDEA_SCHEMA_TEXT
}

pub fn find<'a>(blocks: &'a [PromptBlock], id: &str) -> Option<&'a str> {
    blocks.iter().find(|b| b.id == id).map(|b| b.text.as_str())
}
