mod data;

pub mod controller;
pub mod detail;
pub mod filter;
pub mod render;
pub mod sheet;
pub mod theme;
pub mod url_state;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

pub use controller::{Command, Controller, LoadState, View};
pub use data::Recipe;
pub use detail::{DetailPresenter, DetailView};
pub use filter::{FilterState, filter};
pub use theme::ThemeMode;
pub use url_state::{Location, Navigation, UrlState};
pub use viewport::Viewport;

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Relative location of the recipe list, as served next to the page.
pub const DEFAULT_DATA_PATH: &str = "data/recipes.json";

/// Reasons the recipe list could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse recipe data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only access to the loaded recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    by_id: HashMap<String, usize>,
    categories: Vec<String>,
    tags: Vec<String>,
}

impl RecipeStore {
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let mut by_id = HashMap::with_capacity(recipes.len());
        for (idx, recipe) in recipes.iter().enumerate() {
            by_id.entry(recipe.id.clone()).or_insert(idx);
        }
        let categories = sorted_distinct(recipes.iter().filter_map(|r| r.category.as_deref()));
        let tags = sorted_distinct(recipes.iter().flat_map(|r| r.tags.iter().map(String::as_str)));
        Self {
            recipes,
            by_id,
            categories,
            tags,
        }
    }

    /// Parses a JSON array of recipes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let recipes: Vec<Recipe> = serde_json::from_slice(bytes)?;
        Ok(Self::from_recipes(recipes))
    }

    /// Loads the recipe list from disk. Called once at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let recipes: Vec<Recipe> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_recipes(recipes))
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Returns the first recipe with the given id.
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.by_id.get(id).map(|&idx| &self.recipes[idx])
    }

    /// Distinct categories, sorted for display.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct tags across all recipes, sorted for display.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    let mut sorted: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}
