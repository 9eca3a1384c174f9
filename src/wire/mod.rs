use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{IdeaError, Issue};
use crate::prefs::PreferencesRecord;
use crate::validate::kind;

/// ========================================
/// Ideas and categories
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_engagement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_create: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_post: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
}

impl ContentIdea {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_favorite: false,
            format: None,
            platform: None,
            tags: None,
            estimated_engagement: None,
            difficulty: None,
            time_to_create: None,
            best_time_to_post: None,
            target_audience: None,
            variations: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCategory {
    pub category_name: String,
    pub ideas: Vec<ContentIdea>,
}

/// A validated generation result. Serializes to the `data` member of the
/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Ideas {
        ideas: Vec<ContentIdea>,
    },
    Categories {
        categories: Vec<ContentCategory>,
        #[serde(rename = "extraIdeas", skip_serializing_if = "Vec::is_empty")]
        extra_ideas: Vec<ContentIdea>,
    },
}

impl GenerationResult {
    /// Every idea in the result, in response order.
    pub fn ideas(&self) -> Vec<&ContentIdea> {
        match self {
            Self::Ideas { ideas } => ideas.iter().collect(),
            Self::Categories { categories, extra_ideas } => categories
                .iter()
                .flat_map(|c| c.ideas.iter())
                .chain(extra_ideas.iter())
                .collect(),
        }
    }
}

/// ========================================
/// Requests
/// ========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationOptions {
    #[serde(default)]
    pub categorized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Exactly one of the two supported request shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Prompt { prompt: String, options: GenerationOptions },
    Prefs { prefs: PreferencesRecord },
}

/// The inbound body before the one-branch rule is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGenerationRequest {
    #[serde(default)]
    pub prefs: Option<Value>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
}

impl TryFrom<RawGenerationRequest> for GenerationRequest {
    type Error = IdeaError;

    fn try_from(raw: RawGenerationRequest) -> Result<Self, Self::Error> {
        match (raw.prefs, raw.prompt) {
            (Some(_), Some(_)) => Err(IdeaError::RequestShape(vec![Issue::new(
                "$",
                "exactly one of `prefs` or `prompt`",
                "both",
            )])),
            (None, None) => Err(IdeaError::RequestShape(vec![Issue::new(
                "$",
                "exactly one of `prefs` or `prompt`",
                "neither",
            )])),
            (Some(prefs), None) => {
                if raw.options.is_some() {
                    return Err(IdeaError::RequestShape(vec![Issue::new(
                        "options",
                        "absent with `prefs`",
                        "object",
                    )]));
                }
                match prefs {
                    Value::Object(map) => Ok(Self::Prefs { prefs: map.into() }),
                    other => Err(IdeaError::RequestShape(vec![Issue::new("prefs", "object", kind(&other))])),
                }
            }
            (None, Some(prompt)) => {
                let options = match raw.options {
                    None | Some(Value::Null) => GenerationOptions::default(),
                    Some(v) => serde_json::from_value(v).map_err(|e| {
                        IdeaError::RequestShape(vec![Issue::new("options", "generation options", e.to_string())])
                    })?,
                };
                Ok(Self::Prompt { prompt, options })
            }
        }
    }
}

impl GenerationRequest {
    /// Parse an inbound JSON body into one of the two request branches.
    pub fn from_json(body: &Value) -> Result<Self, IdeaError> {
        let raw: RawGenerationRequest = serde_json::from_value(body.clone()).map_err(|e| {
            IdeaError::RequestShape(vec![Issue::new("$", "{prefs} or {prompt, options}", e.to_string())])
        })?;
        raw.try_into()
    }
}

/// ========================================
/// Response envelope
/// ========================================

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope<T: Serialize> {
    Ok { success: bool, data: T },
    Error { success: bool, error: String },
    Issues { success: bool, errors: Vec<Issue> },
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok { success: true, data }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { success: false, error: message.into() }
    }

    pub fn issues(errors: Vec<Issue>) -> Self {
        Self::Issues { success: false, errors }
    }
}
