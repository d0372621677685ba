//! Markup for the card grid, the active-filter pills and the result summary.
//!
//! Every string that originates from recipe data or user input goes through
//! [`escape_html`] before it is placed in markup.

use crate::{FilterState, Recipe, RecipeStore};
use serde::Serialize;
use std::fmt;

/// Image shown when a recipe has none.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.svg";
const DEFAULT_TITLE: &str = "Recept";

pub const LOADING_MESSAGE: &str = "Laddar recept...";
pub const LOAD_FAILED_MESSAGE: &str = "Kunde inte ladda receptdata.";
pub const NO_MATCHES_MESSAGE: &str = "Inga recept matchar ditt urval.";
pub const NO_ACTIVE_FILTERS: &str = "Inga aktiva filter";

/// Escapes the five reserved markup characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn tag_filter_title(tag: &str) -> String {
    format!("Filtrera på {tag}")
}

/// Whether the grid is waiting for data, showing nothing, or showing cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridState {
    Loading,
    Failed,
    Empty,
    Populated,
}

impl GridState {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            GridState::Empty
        } else {
            GridState::Populated
        }
    }

    /// The explicit "no matches" element is only visible in this state.
    pub fn shows_empty_notice(self) -> bool {
        matches!(self, GridState::Empty)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, GridState::Loading)
    }
}

/// Display data for one grid card. Fields hold raw text; escaping happens
/// when markup is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub aria_label: String,
}

impl CardView {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let title = if recipe.title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            recipe.title.clone()
        };
        Self {
            id: recipe.id.clone(),
            aria_label: format!("Öppna {title}"),
            title,
            image: recipe
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category: recipe.category.clone(),
            tags: recipe.tags.clone(),
        }
    }

    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let badge = self
            .category
            .as_deref()
            .map(|category| {
                format!(r#"<span class="card-badge">{}</span>"#, escape_html(category))
            })
            .unwrap_or_default();
        let tag_buttons = self
            .tags
            .iter()
            .map(|tag| {
                let text = escape_html(tag);
                format!(
                    r#"<button class="mini-tag" data-tag="{text}" title="{title}" type="button">{text}</button>"#,
                    title = escape_html(&tag_filter_title(tag)),
                )
            })
            .collect::<String>();
        let tag_row = if tag_buttons.is_empty() {
            String::new()
        } else {
            format!(r#"<div class="tag-row" role="list">{tag_buttons}</div>"#)
        };
        format!(
            r#"<article class="card" data-id="{id}" tabindex="0" role="button" aria-label="{aria}">
  <div class="card-media">
    <img src="{image}" alt="{title}" loading="lazy" decoding="async">
    {badge}
  </div>
  <div class="card-body">
    <div class="card-header">
      <h3>{title}</h3>
    </div>
    {tag_row}
  </div>
</article>"#,
            id = escape_html(&self.id),
            aria = escape_html(&self.aria_label),
            image = escape_html(&self.image),
        )
    }
}

pub fn cards(recipes: &[&Recipe]) -> Vec<CardView> {
    recipes.iter().map(|recipe| CardView::from_recipe(recipe)).collect()
}

pub fn render_grid_html(cards: &[CardView]) -> String {
    cards
        .iter()
        .map(CardView::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PillKind {
    Category,
    Tags,
    Search,
}

/// One entry of the active-filter summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPill {
    pub kind: PillKind,
    pub label: String,
}

/// Category, tag and search pills, each present only when that axis is set.
pub fn active_filters(state: &FilterState) -> Vec<FilterPill> {
    let mut pills = Vec::new();
    if let Some(category) = &state.category {
        pills.push(FilterPill {
            kind: PillKind::Category,
            label: format!("Kategori: {category}"),
        });
    }
    if !state.tags.is_empty() {
        let joined = state
            .tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        pills.push(FilterPill {
            kind: PillKind::Tags,
            label: format!("Taggar: {joined}"),
        });
    }
    if !state.search_display.is_empty() {
        pills.push(FilterPill {
            kind: PillKind::Search,
            label: format!("Sök: \"{}\"", state.search_display),
        });
    }
    pills
}

pub fn render_active_filters_html(pills: &[FilterPill]) -> String {
    if pills.is_empty() {
        return format!(r#"<span class="muted">{NO_ACTIVE_FILTERS}</span>"#);
    }
    pills
        .iter()
        .map(|pill| format!(r#"<span class="pill">{}</span>"#, escape_html(&pill.label)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The line of text above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum ResultSummary {
    Loading,
    LoadFailed,
    NoMatches,
    Available(usize),
    Matching(usize),
}

impl ResultSummary {
    pub fn for_results(count: usize, state: &FilterState) -> Self {
        match count {
            0 => ResultSummary::NoMatches,
            n if state.is_active() => ResultSummary::Matching(n),
            n => ResultSummary::Available(n),
        }
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSummary::Loading => f.write_str(LOADING_MESSAGE),
            ResultSummary::LoadFailed => f.write_str(LOAD_FAILED_MESSAGE),
            ResultSummary::NoMatches => f.write_str(NO_MATCHES_MESSAGE),
            ResultSummary::Available(n) => write!(f, "{n} recept tillgängliga"),
            ResultSummary::Matching(n) => write!(f, "{n} recept matchar ditt urval"),
        }
    }
}

/// A selectable category or tag chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipView {
    pub value: String,
    pub active: bool,
}

/// Category and tag chips built from the distinct values in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterControls {
    pub categories: Vec<ChipView>,
    pub tags: Vec<ChipView>,
}

impl FilterControls {
    pub fn build(store: &RecipeStore, state: &FilterState) -> Self {
        let categories = store
            .categories()
            .iter()
            .map(|category| ChipView {
                active: state.category.as_deref() == Some(category.as_str()),
                value: category.clone(),
            })
            .collect();
        let tags = store
            .tags()
            .iter()
            .map(|tag| ChipView {
                active: state.tags.contains(tag),
                value: tag.clone(),
            })
            .collect();
        Self { categories, tags }
    }
}
