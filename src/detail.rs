//! The recipe detail dialog.
//!
//! The presenter is either closed or open on one recipe id. Opening from a
//! user selection writes the id into the URL; opening because the URL
//! already carries the id does not, and re-reading the same id while it is
//! open does nothing.

use crate::render::PLACEHOLDER_IMAGE;
use crate::viewport::Viewport;
use crate::{Recipe, RecipeStore};
use serde::Serialize;
use tracing::debug;

/// Populated dialog content for one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub image_alt: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// `None` hides the tips block entirely.
    pub tips: Option<String>,
}

impl DetailView {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            image: recipe
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            image_alt: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            tips: recipe.tips.clone(),
        }
    }

    pub fn tips_hidden(&self) -> bool {
        self.tips.is_none()
    }
}

/// Why a dialog transition was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOrigin {
    /// The user picked a card.
    Selection,
    /// The id was read from the URL.
    Url,
}

/// Result of an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The dialog now shows the recipe; the caller writes the id to the URL
    /// when `write_url` is set.
    Opened { write_url: bool },
    /// Same id already open and the request came from the URL.
    AlreadyOpen,
    /// No recipe with that id; state left as it was.
    UnknownId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPresenter {
    view: Option<DetailView>,
}

impl DetailPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    /// Id of the currently open recipe.
    pub fn open_id(&self) -> Option<&str> {
        self.view.as_ref().map(|view| view.id.as_str())
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    pub fn open(
        &mut self,
        store: &RecipeStore,
        id: &str,
        origin: OpenOrigin,
        viewport: &mut Viewport,
    ) -> OpenOutcome {
        let Some(recipe) = store.get(id) else {
            debug!(id, "ignoring unknown recipe id");
            return OpenOutcome::UnknownId;
        };
        if origin == OpenOrigin::Url && self.open_id() == Some(id) {
            return OpenOutcome::AlreadyOpen;
        }
        let was_open = self.is_open();
        self.view = Some(DetailView::from_recipe(recipe));
        if !was_open {
            viewport.lock();
        }
        OpenOutcome::Opened {
            write_url: origin == OpenOrigin::Selection,
        }
    }

    /// Closes the dialog; returns the scroll offset restored by the release.
    pub fn close(&mut self, viewport: &mut Viewport) -> Option<u32> {
        self.view.take()?;
        viewport.unlock()
    }
}
