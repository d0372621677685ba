//! Single owner of the page state.
//!
//! Every user action and every address-bar change arrives as a [`Command`].
//! [`Controller::dispatch`] applies it, keeps the URL in sync through
//! [`Location`], re-filters and re-renders. A pushed fragment is followed by
//! the same hash-change handling the browser would trigger, so state is always
//! restorable from the URL alone.

use crate::detail::{DetailPresenter, DetailView, OpenOrigin, OpenOutcome};
use crate::render::{self, CardView, FilterControls, FilterPill, GridState, ResultSummary};
use crate::sheet::FilterSheet;
use crate::theme::{ThemeMode, ThemeToggleView};
use crate::url_state::{Location, Navigation, UrlState};
use crate::viewport::Viewport;
use crate::{FilterState, LoadError, RecipeStore, filter};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Progress of the one-time data load.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(Arc<RecipeStore>),
    Failed(String),
}

impl LoadState {
    pub fn store(&self) -> Option<&Arc<RecipeStore>> {
        match self {
            LoadState::Ready(store) => Some(store),
            _ => None,
        }
    }
}

impl From<Result<RecipeStore, LoadError>> for LoadState {
    fn from(result: Result<RecipeStore, LoadError>) -> Self {
        match result {
            Ok(store) => LoadState::Ready(Arc::new(store)),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }
}

/// State-transition messages consumed by the controller.
#[derive(Clone)]
pub enum Command {
    DataLoaded(Arc<RecipeStore>),
    LoadFailed(String),
    SearchInput(String),
    /// Selecting the active category clears it.
    SelectCategory(String),
    /// From a tag chip or a card's mini-tag.
    ToggleTag(String),
    ClearFilters,
    OpenRecipe(String),
    CloseDetail,
    /// The address bar fragment changed underneath the page.
    HashChanged(String),
    Escape,
    ToggleFilters,
    OpenFilters,
    CloseFilters,
    Scrolled(u32),
    Resized(u32),
    ToggleTheme,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DataLoaded(_) => "data_loaded",
            Command::LoadFailed(_) => "load_failed",
            Command::SearchInput(_) => "search_input",
            Command::SelectCategory(_) => "select_category",
            Command::ToggleTag(_) => "toggle_tag",
            Command::ClearFilters => "clear_filters",
            Command::OpenRecipe(_) => "open_recipe",
            Command::CloseDetail => "close_detail",
            Command::HashChanged(_) => "hash_changed",
            Command::Escape => "escape",
            Command::ToggleFilters => "toggle_filters",
            Command::OpenFilters => "open_filters",
            Command::CloseFilters => "close_filters",
            Command::Scrolled(_) => "scrolled",
            Command::Resized(_) => "resized",
            Command::ToggleTheme => "toggle_theme",
        }
    }

    /// Parses the name of a command that carries no payload.
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "clear_filters" => Command::ClearFilters,
            "close_detail" => Command::CloseDetail,
            "escape" => Command::Escape,
            "toggle_filters" => Command::ToggleFilters,
            "open_filters" => Command::OpenFilters,
            "close_filters" => Command::CloseFilters,
            "toggle_theme" => Command::ToggleTheme,
            _ => return None,
        };
        Some(command)
    }
}

pub struct Controller {
    load: LoadState,
    filter: FilterState,
    cards: Vec<CardView>,
    detail: DetailPresenter,
    viewport: Viewport,
    location: Location,
    sheet: FilterSheet,
    theme: ThemeMode,
}

impl Controller {
    /// A page that has not received its data yet, opened at `fragment`.
    pub fn new(fragment: &str, viewport: Viewport) -> Self {
        let location = Location::new(fragment);
        let filter = location.state().filter;
        Self {
            load: LoadState::Loading,
            filter,
            cards: Vec::new(),
            detail: DetailPresenter::new(),
            viewport,
            location,
            sheet: FilterSheet::new(),
            theme: ThemeMode::default(),
        }
    }

    /// A page whose load already finished, restored from `fragment`.
    pub fn loaded(load: LoadState, fragment: &str, viewport: Viewport) -> Self {
        let mut controller = Self::new(fragment, viewport);
        match load {
            LoadState::Ready(store) => controller.dispatch(Command::DataLoaded(store)),
            LoadState::Failed(message) => controller.dispatch(Command::LoadFailed(message)),
            LoadState::Loading => {}
        }
        controller
    }

    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    pub fn dispatch(&mut self, command: Command) {
        trace!(command = command.name(), "dispatch");
        match command {
            Command::DataLoaded(store) => {
                debug!(recipes = store.len(), "recipe data loaded");
                self.load = LoadState::Ready(store);
                self.restore_from_location();
            }
            Command::LoadFailed(message) => {
                warn!(error = %message, "could not load recipe data");
                self.load = LoadState::Failed(message);
                self.cards.clear();
            }
            Command::SearchInput(raw) => {
                self.filter.set_search(&raw);
                self.filters_changed();
            }
            Command::SelectCategory(category) => {
                self.filter.toggle_category(&category);
                self.filters_changed();
            }
            Command::ToggleTag(tag) => {
                self.filter.toggle_tag(&tag);
                self.filters_changed();
            }
            Command::ClearFilters => {
                self.filter.clear();
                self.filters_changed();
            }
            Command::OpenRecipe(id) => self.open_recipe(&id, OpenOrigin::Selection),
            Command::CloseDetail => self.close_detail(),
            Command::HashChanged(fragment) => {
                self.location.assign(&fragment);
                self.restore_from_location();
            }
            Command::Escape => {
                self.close_detail();
                self.sheet.close(&mut self.viewport);
            }
            Command::ToggleFilters => self.sheet.toggle(&mut self.viewport),
            Command::OpenFilters => self.sheet.open(&mut self.viewport),
            Command::CloseFilters => {
                self.sheet.close(&mut self.viewport);
            }
            Command::Scrolled(y) => self.viewport.scroll_to(y),
            Command::Resized(width) => self.viewport.resize(width),
            Command::ToggleTheme => self.theme = self.theme.next(),
        }
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn detail(&self) -> &DetailPresenter {
        &self.detail
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn sheet(&self) -> &FilterSheet {
        &self.sheet
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    /// Current URL state, i.e. the filter plus the open recipe id.
    pub fn url_state(&self) -> UrlState {
        UrlState::new(self.filter.clone(), self.detail.open_id().map(str::to_string))
    }

    pub fn view(&self) -> View {
        let (grid, summary, controls) = match &self.load {
            LoadState::Loading => (GridState::Loading, ResultSummary::Loading, FilterControls::default()),
            LoadState::Failed(_) => (GridState::Failed, ResultSummary::LoadFailed, FilterControls::default()),
            LoadState::Ready(store) => (
                GridState::from_count(self.cards.len()),
                ResultSummary::for_results(self.cards.len(), &self.filter),
                FilterControls::build(store, &self.filter),
            ),
        };
        View {
            grid,
            summary_text: summary.to_string(),
            summary,
            cards: self.cards.clone(),
            active_filters: render::active_filters(&self.filter),
            controls,
            filter: self.filter.clone(),
            detail: self.detail.view().cloned(),
            sheet: self.sheet,
            theme: ThemeToggleView::from(self.theme),
            fragment: self.location.fragment().to_string(),
            scroll_y: self.viewport.scroll_y(),
            scroll_locked: self.viewport.is_locked(),
        }
    }

    fn filters_changed(&mut self) {
        let state = self.url_state();
        self.navigate(&state);
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        let Some(store) = self.load.store() else {
            return;
        };
        self.cards = render::cards(&filter(store.all(), &self.filter));
    }

    /// Rebuilds filter state wholesale from the URL and opens any `id` in it.
    fn restore_from_location(&mut self) {
        let url = self.location.state();
        self.filter = url.filter;
        self.apply_filters();
        if let Some(id) = url.id {
            self.open_recipe(&id, OpenOrigin::Url);
        }
    }

    fn open_recipe(&mut self, id: &str, origin: OpenOrigin) {
        let Some(store) = self.load.store().cloned() else {
            debug!(id, "recipe requested before data loaded");
            return;
        };
        let outcome = self.detail.open(&store, id, origin, &mut self.viewport);
        if let OpenOutcome::Opened { write_url: true } = outcome {
            let state = self.location.state().with_id(id);
            self.navigate(&state);
        }
    }

    fn close_detail(&mut self) {
        if !self.detail.is_open() {
            return;
        }
        self.detail.close(&mut self.viewport);
        let current = self.location.state();
        if current.id.is_some() {
            self.navigate(&current.without_id());
        }
    }

    fn navigate(&mut self, state: &UrlState) {
        if self.location.set_state(state) == Navigation::Pushed {
            self.restore_from_location();
        }
    }
}

/// Everything needed to draw the page at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub grid: GridState,
    pub summary: ResultSummary,
    pub summary_text: String,
    pub cards: Vec<CardView>,
    pub active_filters: Vec<FilterPill>,
    pub controls: FilterControls,
    pub filter: FilterState,
    pub detail: Option<DetailView>,
    pub sheet: FilterSheet,
    pub theme: ThemeToggleView,
    pub fragment: String,
    pub scroll_y: u32,
    pub scroll_locked: bool,
}

impl View {
    pub fn grid_html(&self) -> String {
        render::render_grid_html(&self.cards)
    }

    pub fn active_filters_html(&self) -> String {
        render::render_active_filters_html(&self.active_filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Recipe;

    fn store() -> Arc<RecipeStore> {
        Arc::new(RecipeStore::from_recipes(vec![
            Recipe::new("a", "Pannkakor")
                .with_category("Efterrätt")
                .with_tags(["söt", "snabb"]),
            Recipe::new("b", "Köttbullar")
                .with_category("Huvudrätt")
                .with_tags(["salt"]),
        ]))
    }

    fn ready(fragment: &str) -> Controller {
        let mut controller = Controller::new(fragment, Viewport::new(1200));
        controller.dispatch(Command::DataLoaded(store()));
        controller
    }

    fn card_ids(controller: &Controller) -> Vec<&str> {
        controller.cards().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn loading_is_distinct_from_empty() {
        let loading = Controller::new("", Viewport::default()).view();
        assert_eq!(loading.grid, GridState::Loading);
        assert_eq!(loading.summary_text, "Laddar recept...");

        let mut empty = ready("");
        empty.dispatch(Command::SearchInput("xyz".into()));
        let view = empty.view();
        assert_eq!(view.grid, GridState::Empty);
        assert!(view.cards.is_empty());
        assert_eq!(view.summary_text, "Inga recept matchar ditt urval.");

        let mut nothing = Controller::new("", Viewport::default());
        nothing.dispatch(Command::DataLoaded(Arc::new(RecipeStore::default())));
        assert_eq!(nothing.view().grid, GridState::Empty);
    }

    #[test]
    fn load_failure_shows_static_message() {
        let mut controller = Controller::new("q=soppa", Viewport::default());
        controller.dispatch(Command::LoadFailed("boom".into()));
        let view = controller.view();
        assert_eq!(view.grid, GridState::Failed);
        assert_eq!(view.summary_text, "Kunde inte ladda receptdata.");
        assert!(view.cards.is_empty());
    }

    #[test]
    fn state_is_restored_from_initial_fragment() {
        let controller = ready("q=pann&tags=s%C3%B6t");
        assert_eq!(controller.filter_state().search_display, "pann");
        assert_eq!(card_ids(&controller), ["a"]);
        assert_eq!(controller.view().summary_text, "1 recept matchar ditt urval");
    }

    #[test]
    fn filter_commands_update_url() {
        let mut controller = ready("");
        assert_eq!(controller.view().summary_text, "2 recept tillgängliga");

        controller.dispatch(Command::SelectCategory("Huvudrätt".into()));
        assert_eq!(controller.location().fragment(), "cat=Huvudr%C3%A4tt");
        assert_eq!(card_ids(&controller), ["b"]);

        controller.dispatch(Command::SelectCategory("Huvudrätt".into()));
        assert_eq!(controller.location().fragment(), "");
        assert_eq!(card_ids(&controller), ["a", "b"]);

        controller.dispatch(Command::ToggleTag("söt".into()));
        controller.dispatch(Command::SearchInput(" Pann ".into()));
        assert_eq!(controller.location().fragment(), "q=Pann&tags=s%C3%B6t");

        controller.dispatch(Command::ClearFilters);
        assert_eq!(controller.location().fragment(), "");
        assert!(!controller.filter_state().is_active());
    }

    #[test]
    fn open_and_close_preserve_other_params() {
        let mut controller = ready("q=pann&cat=Efterr%C3%A4tt&tags=snabb");
        controller.dispatch(Command::Scrolled(640));
        controller.dispatch(Command::OpenRecipe("a".into()));
        assert_eq!(
            controller.location().fragment(),
            "q=pann&cat=Efterr%C3%A4tt&tags=snabb&id=a"
        );
        assert_eq!(controller.detail().open_id(), Some("a"));
        assert!(controller.viewport().is_locked());

        controller.dispatch(Command::CloseDetail);
        assert_eq!(
            controller.location().fragment(),
            "q=pann&cat=Efterr%C3%A4tt&tags=snabb"
        );
        assert_eq!(controller.detail().open_id(), None);
        assert_eq!(controller.viewport().scroll_y(), 640);
        assert!(!controller.viewport().is_locked());
    }

    #[test]
    fn opening_from_empty_url_and_closing_clears_fragment() {
        let mut controller = ready("");
        controller.dispatch(Command::OpenRecipe("a".into()));
        assert_eq!(controller.location().fragment(), "id=a");
        let history = controller.location().history_len();
        controller.dispatch(Command::CloseDetail);
        assert_eq!(controller.location().fragment(), "");
        assert_eq!(controller.location().history_len(), history);
    }

    #[test]
    fn id_in_url_opens_without_rewriting() {
        let controller = ready("id=b");
        assert_eq!(controller.detail().open_id(), Some("b"));
        assert_eq!(controller.location().history_len(), 1);

        let mut controller = ready("id=missing");
        assert!(!controller.detail().is_open());
        controller.dispatch(Command::HashChanged("#id=a".into()));
        assert_eq!(controller.detail().open_id(), Some("a"));
        let history = controller.location().history_len();
        controller.dispatch(Command::HashChanged("id=a".into()));
        assert_eq!(controller.location().history_len(), history);
    }

    #[test]
    fn hash_change_recomputes_state_wholesale() {
        let mut controller = ready("cat=Efterr%C3%A4tt&q=pann");
        controller.dispatch(Command::HashChanged("tags=salt".into()));
        let state = controller.filter_state();
        assert_eq!(state.category, None);
        assert!(state.search_text.is_empty());
        assert_eq!(card_ids(&controller), ["b"]);
    }

    #[test]
    fn escape_closes_dialog_and_sheet() {
        let mut controller = ready("");
        controller.dispatch(Command::Resized(500));
        controller.dispatch(Command::Scrolled(90));
        controller.dispatch(Command::ToggleFilters);
        assert!(controller.sheet().is_overlay());
        controller.dispatch(Command::OpenRecipe("b".into()));
        controller.dispatch(Command::Escape);
        assert!(!controller.detail().is_open());
        assert!(!controller.sheet().is_visible());
        assert!(!controller.viewport().is_locked());
        assert_eq!(controller.viewport().scroll_y(), 90);
    }

    #[test]
    fn tag_with_separator_survives_url_round_trip() {
        let mut controller = Controller::new("", Viewport::default());
        controller.dispatch(Command::DataLoaded(Arc::new(RecipeStore::from_recipes(vec![
            Recipe::new("s", "Stekt strömming").with_tags(["salt, peppar"]),
            Recipe::new("p", "Pannkakor").with_tags(["salt"]),
        ]))));
        controller.dispatch(Command::ToggleTag("salt, peppar".into()));
        assert_eq!(controller.location().fragment(), "tags=salt%252C+peppar");
        assert_eq!(controller.filter_state().tags.len(), 1);
        assert_eq!(card_ids(&controller), ["s"]);

        controller.dispatch(Command::HashChanged("tags=salt%252C+peppar".into()));
        assert_eq!(card_ids(&controller), ["s"]);
    }

    #[test]
    fn payload_free_commands_parse_by_name() {
        for name in ["clear_filters", "close_detail", "escape", "toggle_filters", "toggle_theme"] {
            assert_eq!(Command::from_name(name).map(|c| c.name()), Some(name));
        }
        assert!(Command::from_name("open_recipe").is_none());
        assert!(Command::from_name("").is_none());
    }

    #[test]
    fn theme_cycles() {
        let mut controller = ready("");
        controller.dispatch(Command::ToggleTheme);
        assert_eq!(controller.view().theme.mode, ThemeMode::Dark);
        assert!(controller.view().theme.aria_pressed);
    }

    #[test]
    fn view_escapes_markup() {
        let store = Arc::new(RecipeStore::from_recipes(vec![Recipe::new(
            "x",
            "<script>alert('x')</script>",
        )]));
        let mut controller = Controller::new("", Viewport::default());
        controller.dispatch(Command::DataLoaded(store));
        let html = controller.view().grid_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
