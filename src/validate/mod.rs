//! Schema checks between raw LLM JSON and typed generation results.
//!
//! The walk collects every issue it finds with a JSON-path style location,
//! but any issue rejects the whole response. Array order is preserved.

use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{IdeaError, Issue};
use crate::prompt::ExpectedShape;
use crate::wire::{ContentCategory, ContentIdea, Difficulty, GenerationResult};

const IDEA_FIELDS: &[&str] = &[
    "id",
    "title",
    "description",
    "isFavorite",
    "format",
    "platform",
    "tags",
    "estimatedEngagement",
    "difficulty",
    "timeToCreate",
    "bestTimeToPost",
    "targetAudience",
    "variations",
];

/// Hands out `idea-<unix-millis>-<seq>` ids for ideas the LLM left unnamed.
#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("idea-{}-{}", Utc::now().timestamp_millis(), seq)
    }
}

pub(crate) fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Walker<'a> {
    ids: &'a IdGenerator,
    seen_ids: HashSet<String>,
    issues: Vec<Issue>,
}

impl<'a> Walker<'a> {
    fn issue(&mut self, path: &str, expected: &str, actual: impl Into<String>) {
        self.issues.push(Issue::new(path, expected, actual));
    }

    fn reject_unknown(&mut self, obj: &Map<String, Value>, allowed: &[&str], path: &str) {
        for key in obj.keys() {
            if !allowed.contains(&key.as_str()) {
                self.issue(&format!("{path}.{key}"), "no such field", "unknown field");
            }
        }
    }

    fn required_str(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.issue(&format!("{path}.{key}"), "string", kind(other));
                None
            }
            None => {
                self.issue(&format!("{path}.{key}"), "string", "missing");
                None
            }
        }
    }

    fn optional_str(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.issue(&format!("{path}.{key}"), "string", kind(other));
                None
            }
        }
    }

    fn optional_str_list(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<Vec<String>> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        other => self.issue(&format!("{path}.{key}[{i}]"), "string", kind(other)),
                    }
                }
                Some(out)
            }
            Some(other) => {
                self.issue(&format!("{path}.{key}"), "array of strings", kind(other));
                None
            }
        }
    }

    fn idea(&mut self, v: &Value, path: &str) -> Option<ContentIdea> {
        let Value::Object(obj) = v else {
            self.issue(path, "object", kind(v));
            return None;
        };
        let before = self.issues.len();
        self.reject_unknown(obj, IDEA_FIELDS, path);

        let id = match obj.get("id") {
            None | Some(Value::Null) => Some(self.ids.next_id()),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if !self.seen_ids.insert(s.clone()) {
                    self.issue(&format!("{path}.id"), "unique id", format!("duplicate {s:?}"));
                }
                Some(s.clone())
            }
            Some(Value::String(_)) => {
                self.issue(&format!("{path}.id"), "non-empty string", "empty string");
                None
            }
            Some(other) => {
                self.issue(&format!("{path}.id"), "string", kind(other));
                None
            }
        };
        let title = self.required_str(obj, "title", path);
        let description = self.required_str(obj, "description", path);
        let is_favorite = match obj.get("isFavorite") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.issue(&format!("{path}.isFavorite"), "boolean", kind(other));
                false
            }
        };
        let difficulty = match self.optional_str(obj, "difficulty", path) {
            None => None,
            Some(s) => match Difficulty::parse(&s) {
                Some(d) => Some(d),
                None => {
                    self.issue(&format!("{path}.difficulty"), "easy|medium|hard", format!("{s:?}"));
                    None
                }
            },
        };
        let format = self.optional_str(obj, "format", path);
        let platform = self.optional_str(obj, "platform", path);
        let tags = self.optional_str_list(obj, "tags", path);
        let estimated_engagement = self.optional_str(obj, "estimatedEngagement", path);
        let time_to_create = self.optional_str(obj, "timeToCreate", path);
        let best_time_to_post = self.optional_str(obj, "bestTimeToPost", path);
        let target_audience = self.optional_str(obj, "targetAudience", path);
        let variations = self.optional_str_list(obj, "variations", path);

        if self.issues.len() > before {
            return None;
        }
        Some(ContentIdea {
            id: id?,
            title: title?,
            description: description?,
            is_favorite,
            format,
            platform,
            tags,
            estimated_engagement,
            difficulty,
            time_to_create,
            best_time_to_post,
            target_audience,
            variations,
        })
    }

    fn idea_list(&mut self, v: Option<&Value>, path: &str, required: bool) -> Vec<ContentIdea> {
        match v {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.idea(item, &format!("{path}[{i}]")))
                .collect(),
            None if !required => Vec::new(),
            None => {
                self.issue(path, "array", "missing");
                Vec::new()
            }
            Some(other) => {
                self.issue(path, "array", kind(other));
                Vec::new()
            }
        }
    }

    fn categories(&mut self, v: Option<&Value>, name_key: &str) -> Vec<ContentCategory> {
        let items = match v {
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.issue("categories", "array", kind(other));
                return Vec::new();
            }
            None => {
                self.issue("categories", "array", "missing");
                return Vec::new();
            }
        };
        let mut names = HashSet::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("categories[{i}]");
            let Value::Object(obj) = item else {
                self.issue(&path, "object", kind(item));
                continue;
            };
            self.reject_unknown(obj, &[name_key, "ideas"], &path);
            let name = match self.required_str(obj, name_key, &path) {
                Some(n) if n.trim().is_empty() => {
                    self.issue(&format!("{path}.{name_key}"), "non-empty string", "empty string");
                    None
                }
                Some(n) => {
                    if !names.insert(n.clone()) {
                        self.issue(&format!("{path}.{name_key}"), "unique name", format!("duplicate {n:?}"));
                    }
                    Some(n)
                }
                None => None,
            };
            let ideas = self.idea_list(obj.get("ideas"), &format!("{path}.ideas"), true);
            if let Some(category_name) = name {
                out.push(ContentCategory { category_name, ideas });
            }
        }
        out
    }
}

/// Check parsed completion JSON against `shape` and build the typed result.
///
/// Ideas without an `id` get one from `ids`. Any issue fails the whole
/// response; the error lists every issue found, first one first.
pub fn validate(value: &Value, shape: ExpectedShape, ids: &IdGenerator) -> Result<GenerationResult, IdeaError> {
    let mut w = Walker { ids, seen_ids: HashSet::new(), issues: Vec::new() };
    let Value::Object(root) = value else {
        return Err(IdeaError::SchemaValidation(vec![Issue::new("$", "object", kind(value))]));
    };

    let result = match shape {
        ExpectedShape::Ideas => {
            w.reject_unknown(root, &["ideas"], "$");
            GenerationResult::Ideas { ideas: w.idea_list(root.get("ideas"), "ideas", true) }
        }
        ExpectedShape::Categories => {
            w.reject_unknown(root, &["categories"], "$");
            GenerationResult::Categories {
                categories: w.categories(root.get("categories"), "name"),
                extra_ideas: Vec::new(),
            }
        }
        ExpectedShape::PrefsCategories => {
            w.reject_unknown(root, &["categories", "extraIdeas"], "$");
            let categories = w.categories(root.get("categories"), "categoryName");
            let extra_ideas = match root.get("extraIdeas") {
                Some(Value::Null) => Vec::new(),
                other => w.idea_list(other, "extraIdeas", false),
            };
            GenerationResult::Categories { categories, extra_ideas }
        }
    };

    if w.issues.is_empty() {
        Ok(result)
    } else {
        Err(IdeaError::SchemaValidation(w.issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issues(err: IdeaError) -> Vec<Issue> {
        match err {
            IdeaError::SchemaValidation(i) => i,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_flat_list() {
        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","isFavorite":false}]});
        let out = validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap();
        assert_eq!(out, GenerationResult::Ideas { ideas: vec![ContentIdea::new("1", "T", "D")] });
    }

    #[test]
    fn missing_title_rejects_everything() {
        let v = json!({"ideas":[
            {"id":"1","title":"ok","description":"D"},
            {"id":"2","description":"D"}
        ]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("ideas[1].title", "string", "missing"));
    }

    #[test]
    fn null_required_field_is_rejected() {
        let v = json!({"ideas":[{"id":"1","title":null,"description":"D"}]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].actual, "null");
    }

    #[test]
    fn top_level_key_must_be_array() {
        let i = issues(validate(&json!({"ideas": {}}), ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("ideas", "array", "object"));
        let i = issues(validate(&json!({}), ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("ideas", "array", "missing"));
        let i = issues(validate(&json!([1]), ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("$", "object", "array"));
    }

    #[test]
    fn optional_fields_are_typed_strictly() {
        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","tags":"a,b"}]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("ideas[0].tags", "array of strings", "string"));

        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","difficulty":"extreme"}]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "ideas[0].difficulty");
    }

    #[test]
    fn enrichment_fields_pass_through() {
        let v = json!({"ideas":[{
            "id":"1","title":"T","description":"D","isFavorite":true,
            "platform":"instagram","tags":["bread","morning"],"difficulty":"easy",
            "variations":["v1"],"bestTimeToPost":null
        }]});
        let GenerationResult::Ideas { ideas } = validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap() else {
            panic!("expected flat ideas");
        };
        assert!(ideas[0].is_favorite);
        assert_eq!(ideas[0].platform.as_deref(), Some("instagram"));
        assert_eq!(ideas[0].tags.as_ref().unwrap(), &vec!["bread".to_string(), "morning".to_string()]);
        assert_eq!(ideas[0].difficulty, Some(Difficulty::Easy));
        assert_eq!(ideas[0].best_time_to_post, None);
    }

    #[test]
    fn null_favorite_flag_counts_as_absent() {
        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","isFavorite":null}]});
        let out = validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap();
        assert_eq!(out, GenerationResult::Ideas { ideas: vec![ContentIdea::new("1", "T", "D")] });

        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","isFavorite":"yes"}]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0], Issue::new("ideas[0].isFavorite", "boolean", "string"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let v = json!({"ideas":[{"id":"1","title":"T","description":"D","mood":"happy"}]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "ideas[0].mood");
    }

    #[test]
    fn missing_ids_are_assigned_and_duplicates_rejected() {
        let v = json!({"ideas":[
            {"title":"A","description":"D"},
            {"title":"B","description":"D"}
        ]});
        let out = validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap();
        let ids: Vec<_> = out.ideas().iter().map(|i| i.id.clone()).collect();
        assert!(ids[0].starts_with("idea-"));
        assert_ne!(ids[0], ids[1]);

        let v = json!({"ideas":[
            {"id":"x","title":"A","description":"D"},
            {"id":"x","title":"B","description":"D"}
        ]});
        let i = issues(validate(&v, ExpectedShape::Ideas, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "ideas[1].id");
    }

    #[test]
    fn categories_keep_order_and_use_name_key() {
        let v = json!({"categories":[
            {"name":"Behind the scenes","ideas":[{"id":"1","title":"T","description":"D"}]},
            {"name":"Promotions","ideas":[]}
        ]});
        let out = validate(&v, ExpectedShape::Categories, &IdGenerator::new()).unwrap();
        let GenerationResult::Categories { categories, extra_ideas } = out else {
            panic!("expected categories");
        };
        assert_eq!(categories[0].category_name, "Behind the scenes");
        assert_eq!(categories[1].category_name, "Promotions");
        assert!(extra_ideas.is_empty());
    }

    #[test]
    fn category_names_must_be_unique_and_non_empty() {
        let v = json!({"categories":[{"name":"A","ideas":[]},{"name":"A","ideas":[]}]});
        let i = issues(validate(&v, ExpectedShape::Categories, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "categories[1].name");

        let v = json!({"categories":[{"name":"","ideas":[]}]});
        assert!(validate(&v, ExpectedShape::Categories, &IdGenerator::new()).is_err());
    }

    #[test]
    fn nested_idea_errors_reject_categorized_response() {
        let v = json!({"categories":[{"name":"A","ideas":[{"id":"1","description":"D"}]}]});
        let i = issues(validate(&v, ExpectedShape::Categories, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "categories[0].ideas[0].title");
    }

    #[test]
    fn prefs_shape_with_extra_ideas() {
        let v = json!({
            "categories":[{"categoryName":"Tips","ideas":[{"id":"1","title":"T","description":"D"}]}],
            "extraIdeas":[{"id":"2","title":"E","description":"D"}]
        });
        let out = validate(&v, ExpectedShape::PrefsCategories, &IdGenerator::new()).unwrap();
        assert_eq!(out.ideas().len(), 2);

        let v = json!({"categories":[{"categoryName":"Tips","ideas":[{"id":"1","title":"T","description":"D"}]}],
                       "extraIdeas":[{"id":"1","title":"E","description":"D"}]});
        let i = issues(validate(&v, ExpectedShape::PrefsCategories, &IdGenerator::new()).unwrap_err());
        assert_eq!(i[0].path, "extraIdeas[0].id");
    }

    #[test]
    fn prefs_shape_rejects_name_key() {
        let v = json!({"categories":[{"name":"Tips","ideas":[]}]});
        assert!(validate(&v, ExpectedShape::PrefsCategories, &IdGenerator::new()).is_err());
    }
}
