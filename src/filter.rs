//! Search, category and tag filtering over the recipe list.
//!
//! Filtering is a linear scan: every predicate that has no constraint set
//! passes, and a recipe is kept when all three pass. Output keeps the input
//! order; there is no scoring.

use crate::Recipe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The active search/category/tag constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-folded search text used for matching.
    pub search_text: String,
    /// Search text as typed (trimmed), echoed back in the UI and URL.
    pub search_display: String,
    pub category: Option<String>,
    /// Selected tags; a recipe matches when it carries ANY of them.
    pub tags: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, raw: &str) -> Self {
        self.set_search(raw);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.is_empty()).then_some(category);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty())
            .collect();
        self
    }

    /// Stores the trimmed display text and its case-folded search form.
    pub fn set_search(&mut self, raw: &str) {
        let trimmed = raw.trim();
        self.search_display = trimmed.to_string();
        self.search_text = trimmed.to_lowercase();
    }

    /// Selects `category`, or clears the selection when it is already active.
    pub fn toggle_category(&mut self, category: &str) {
        if self.category.as_deref() == Some(category) || category.is_empty() {
            self.category = None;
        } else {
            self.category = Some(category.to_string());
        }
    }

    /// Adds or removes `tag`; returns whether it is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when any axis carries a constraint.
    pub fn is_active(&self) -> bool {
        self.category.is_some() || !self.tags.is_empty() || !self.search_display.is_empty()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_category(recipe) && self.matches_search(recipe) && self.matches_tags(recipe)
    }

    pub fn matches_category(&self, recipe: &Recipe) -> bool {
        match &self.category {
            None => true,
            Some(category) => recipe.category.as_deref() == Some(category.as_str()),
        }
    }

    pub fn matches_search(&self, recipe: &Recipe) -> bool {
        let needle = self.search_text.as_str();
        if needle.is_empty() {
            return true;
        }
        let hit = |text: &String| text.to_lowercase().contains(needle);
        hit(&recipe.title) || recipe.ingredients.iter().any(hit) || recipe.tags.iter().any(hit)
    }

    pub fn matches_tags(&self, recipe: &Recipe) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|tag| recipe.has_tag(tag))
    }
}

/// Returns the recipes that satisfy `state`, in their original order.
pub fn filter<'a>(recipes: &'a [Recipe], state: &FilterState) -> Vec<&'a Recipe> {
    recipes.iter().filter(|recipe| state.matches(recipe)).collect()
}
