use std::collections::HashSet;

use crate::errors::IdeaError;
use crate::favorites::FavoriteStore;
use crate::wire::{ContentCategory, ContentIdea, GenerationResult};

/// Set `isFavorite` from the caller's favorite ids, ignoring whatever the LLM said.
pub fn merge_ideas(ideas: &[ContentIdea], favorite_ids: &HashSet<String>) -> Vec<ContentIdea> {
    ideas
        .iter()
        .map(|idea| ContentIdea { is_favorite: favorite_ids.contains(&idea.id), ..idea.clone() })
        .collect()
}

/// [`merge_ideas`] applied inside every category and to extra ideas.
/// Category names and order are untouched.
pub fn merge_favorites(result: &GenerationResult, favorite_ids: &HashSet<String>) -> GenerationResult {
    match result {
        GenerationResult::Ideas { ideas } => GenerationResult::Ideas { ideas: merge_ideas(ideas, favorite_ids) },
        GenerationResult::Categories { categories, extra_ideas } => GenerationResult::Categories {
            categories: categories
                .iter()
                .map(|c| ContentCategory { category_name: c.category_name.clone(), ideas: merge_ideas(&c.ideas, favorite_ids) })
                .collect(),
            extra_ideas: merge_ideas(extra_ideas, favorite_ids),
        },
    }
}

/// Flip `isFavorite` and mirror the new state into `store`.
pub fn toggle_favorite(idea: &ContentIdea, store: &dyn FavoriteStore) -> Result<ContentIdea, IdeaError> {
    let toggled = ContentIdea { is_favorite: !idea.is_favorite, ..idea.clone() };
    if toggled.is_favorite {
        store.add(&toggled.id)?;
    } else {
        store.remove(&toggled.id)?;
    }
    tracing::info!(id = %toggled.id, favorite = toggled.is_favorite, "favorite toggled");
    Ok(toggled)
}
