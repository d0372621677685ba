use crate::controller::{Command, Controller, LoadState, View};
use crate::detail::DetailView;
use crate::render::{self, CardView};
use crate::theme::{ThemeMode, ThemeToggleView};
use crate::url_state::{UrlState, join_tags, split_tags};
use crate::viewport::Viewport;
use crate::{DEFAULT_DATA_PATH, FilterState, Recipe, RecipeStore, filter};
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use include_dir::{Dir, include_dir};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utoipa::{IntoParams, OpenApi, ToSchema};

type SharedState = Arc<AppState>;
const THEME_COOKIE: &str = "theme";
/// Page-only query key holding the filter sheet open; not part of the URL state.
const SHEET_PARAM: &str = "filters";

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");
static OPENAPI: Lazy<utoipa::openapi::OpenApi> = Lazy::new(ApiDoc::openapi);

#[derive(Clone)]
pub struct AppState {
    pub load: LoadState,
    pub base_url: String,
    pub persist_theme: bool,
}

impl AppState {
    fn store(&self) -> Result<&RecipeStore, ApiError> {
        self.load
            .store()
            .map(Arc::as_ref)
            .ok_or_else(|| ApiError::unavailable("Recipe data unavailable"))
    }
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub base_url: String,
    pub data_path: PathBuf,
    /// Keep the theme cookie across browser sessions.
    pub persist_theme: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            base_url: "http://127.0.0.1:8080".to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            persist_theme: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global `tracing` subscriber; `RUST_LOG` overrides `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn serve(config: WebConfig) -> Result<(), WebError> {
    let load = LoadState::from(RecipeStore::load(&config.data_path));
    match &load {
        LoadState::Ready(store) => info!(
            recipes = store.len(),
            path = %config.data_path.display(),
            "Loaded recipe data"
        ),
        LoadState::Failed(message) => error!(
            error = %message,
            path = %config.data_path.display(),
            "Could not load recipe data; serving failure page"
        ),
        LoadState::Loading => {}
    }
    let state = Arc::new(AppState {
        load,
        base_url: config.base_url.clone(),
        persist_theme: config.persist_theme,
    });
    let router = build_router(state);
    info!(
        %config.addr,
        base = %config.base_url,
        persist_theme = config.persist_theme,
        "Binding HTTP listener"
    );
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/theme", post(toggle_theme))
        .route("/data/recipes.json", get(recipes_json))
        .route("/api/recipes", get(api_recipes))
        .route("/api/recipes/:id", get(api_recipe))
        .route("/api/view", get(api_view))
        .route("/api/theme", get(api_theme))
        .route("/api/openapi.json", get(openapi_json))
        .route("/assets/*path", get(static_asset))
        .route("/healthz", get(health))
        .route("/sitemap.xml", get(sitemap_xml))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "receptbok-web" }))
}

/// Server-rendered page for the URL state carried in the query string.
async fn index_html(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Html<String> {
    let theme = theme_from_headers(&headers);
    let (fragment, sheet_open) = split_sheet_param(query.as_deref().unwrap_or_default());
    let mut controller =
        Controller::loaded(state.load.clone(), &fragment, Viewport::default()).with_theme(theme);
    if sheet_open {
        controller.dispatch(Command::OpenFilters);
    }
    let template = PageTemplate::new(&controller, &state.base_url);
    Html(
        template
            .render()
            .unwrap_or_else(|err| render_error_page(&err.to_string())),
    )
}

/// Separates the sheet flag from the URL state keys of a query string.
fn split_sheet_param(query: &str) -> (String, bool) {
    let mut sheet_open = false;
    let rest = query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| match pair.split_once('=') {
            Some((key, value)) if key == SHEET_PARAM => {
                sheet_open |= value == "open";
                false
            }
            _ => *pair != SHEET_PARAM,
        })
        .collect::<Vec<_>>()
        .join("&");
    (rest, sheet_open)
}

fn render_error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="sv">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Receptbok • Fel</title>
    <link rel="stylesheet" href="/assets/style.css">
  </head>
  <body>
    <main>
      <h1>Något gick fel</h1>
      <p class="muted">{}</p>
      <a href="/">Till startsidan</a>
    </main>
  </body>
</html>"#,
        render::escape_html(message)
    )
}

#[derive(Debug, Deserialize)]
struct ThemeForm {
    return_to: Option<String>,
}

async fn toggle_theme(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ThemeForm>,
) -> Response {
    let next = theme_from_headers(&headers).next();
    let target = form
        .return_to
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string());
    (
        [(header::SET_COOKIE, theme_cookie(next, state.persist_theme))],
        Redirect::to(&target),
    )
        .into_response()
}

async fn recipes_json(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let store = state.store()?;
    Ok(Json(store.all()).into_response())
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct FilterQuery {
    /// Free-text search over titles, ingredients and tags.
    q: Option<String>,
    /// Exact category.
    cat: Option<String>,
    /// Comma-separated tags; any of them matches.
    tags: Option<String>,
}

impl From<FilterQuery> for FilterState {
    fn from(query: FilterQuery) -> Self {
        let tags = query.tags.as_deref().map(split_tags).unwrap_or_default();
        FilterState::new()
            .with_search(query.q.as_deref().unwrap_or_default())
            .with_category(query.cat.unwrap_or_default())
            .with_tags(tags)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
struct RecipeCardPayload {
    id: String,
    title: String,
    image: String,
    category: Option<String>,
    tags: Vec<String>,
}

impl From<CardView> for RecipeCardPayload {
    fn from(card: CardView) -> Self {
        Self {
            id: card.id,
            title: card.title,
            image: card.image,
            category: card.category,
            tags: card.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
struct RecipesPayload {
    /// URL state equivalent of the request.
    fragment: String,
    count: usize,
    summary: String,
    active_filters: Vec<String>,
    recipes: Vec<RecipeCardPayload>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(FilterQuery),
    responses(
        (status = 200, description = "Recipes matching the filter, in store order", body = RecipesPayload),
        (status = 503, description = "Recipe data could not be loaded")
    )
)]
async fn api_recipes(
    State(state): State<SharedState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<RecipesPayload>, ApiError> {
    let store = state.store()?;
    let filter_state = FilterState::from(query);
    let cards = render::cards(&filter(store.all(), &filter_state));
    let summary = render::ResultSummary::for_results(cards.len(), &filter_state);
    Ok(Json(RecipesPayload {
        fragment: UrlState::new(filter_state.clone(), None).encode(),
        count: cards.len(),
        summary: summary.to_string(),
        active_filters: render::active_filters(&filter_state)
            .into_iter()
            .map(|pill| pill.label)
            .collect(),
        recipes: cards.into_iter().map(RecipeCardPayload::from).collect(),
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
struct DetailPayload {
    id: String,
    title: String,
    image: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    tips: Option<String>,
}

impl From<DetailView> for DetailPayload {
    fn from(view: DetailView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            image: view.image,
            ingredients: view.ingredients,
            instructions: view.instructions,
            tips: view.tips,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Detail content for one recipe", body = DetailPayload),
        (status = 404, description = "No recipe with that id"),
        (status = 503, description = "Recipe data could not be loaded")
    )
)]
async fn api_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DetailPayload>, ApiError> {
    let store = state.store()?;
    let recipe = store
        .get(&id)
        .ok_or_else(|| ApiError::not_found(format!("No recipe with id {id:?}")))?;
    Ok(Json(DetailView::from_recipe(recipe).into()))
}

#[derive(Debug, Deserialize)]
struct ViewParams {
    fragment: Option<String>,
    theme: Option<String>,
    /// Viewport width in CSS pixels.
    width: Option<u32>,
    /// Scroll offset before `commands` run.
    scroll: Option<u32>,
    /// Comma-separated command names applied in order, e.g. `open_filters,escape`.
    commands: Option<String>,
}

#[derive(Debug, Serialize)]
struct ViewPayload {
    view: View,
    grid_html: String,
    active_filters_html: String,
}

/// Page state for a URL fragment, with the markup a script would inject.
async fn api_view(
    State(state): State<SharedState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<ViewPayload>, ApiError> {
    let commands = params
        .commands
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Command::from_name(name)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown command {name:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut controller = Controller::loaded(state.load.clone(), "", Viewport::default())
        .with_theme(ThemeMode::from_attribute(params.theme.as_deref()));
    // Layout applies before the fragment so an open dialog locks at the given offset.
    let replay = params
        .width
        .map(Command::Resized)
        .into_iter()
        .chain(params.scroll.map(Command::Scrolled))
        .chain(params.fragment.map(Command::HashChanged))
        .chain(commands);
    for command in replay {
        controller.dispatch(command);
    }
    let view = controller.view();
    Ok(Json(ViewPayload {
        grid_html: view.grid_html(),
        active_filters_html: view.active_filters_html(),
        view,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ThemeParams {
    /// Current `data-theme` value; missing or unknown reads as `auto`.
    current: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/theme",
    params(ThemeParams),
    responses((status = 200, description = "Toggle state after one click", body = ThemeToggleView))
)]
async fn api_theme(Query(params): Query<ThemeParams>) -> Json<ThemeToggleView> {
    let next = ThemeMode::from_attribute(params.current.as_deref()).next();
    Json(next.into())
}

#[derive(OpenApi)]
#[openapi(
    paths(api_recipes, api_recipe, api_theme),
    components(schemas(RecipesPayload, RecipeCardPayload, DetailPayload, ThemeToggleView, ThemeMode))
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(OPENAPI.clone())
}

async fn static_asset(Path(path): Path<String>) -> Response {
    let Some(file) = ASSETS.get_file(&path) else {
        return (StatusCode::NOT_FOUND, "asset not found").into_response();
    };
    let content_type = match file.path().extension().and_then(|ext| ext.to_str()) {
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        _ => mime::APPLICATION_OCTET_STREAM,
    };
    (
        [(header::CONTENT_TYPE, content_type.to_string())],
        file.contents(),
    )
        .into_response()
}

async fn sitemap_xml(State(state): State<SharedState>) -> Response {
    let mut body = String::with_capacity(1024);
    body.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    body.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    let mut push_url = |loc: String, priority: &str| {
        body.push_str("<url><loc>");
        body.push_str(&render::escape_html(&loc));
        body.push_str("</loc><changefreq>weekly</changefreq><priority>");
        body.push_str(priority);
        body.push_str("</priority></url>");
    };
    push_url(absolute_url(&state.base_url, &UrlState::default()), "0.8");
    if let Some(store) = state.load.store() {
        for category in store.categories() {
            let url = UrlState::new(FilterState::new().with_category(category.clone()), None);
            push_url(absolute_url(&state.base_url, &url), "0.6");
        }
        for recipe in store.all() {
            let url = UrlState::default().with_id(recipe.id.clone());
            push_url(absolute_url(&state.base_url, &url), "0.5");
        }
    }
    body.push_str("</urlset>");
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn theme_from_headers(headers: &HeaderMap) -> ThemeMode {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == THEME_COOKIE)
        .map(|cookie| ThemeMode::from_attribute(Some(cookie.value())))
        .unwrap_or_default()
}

/// Session cookie unless persistence was enabled.
fn theme_cookie(mode: ThemeMode, persist: bool) -> String {
    let builder = Cookie::build((THEME_COOKIE, mode.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true);
    let cookie = if persist {
        builder.permanent().build()
    } else {
        builder.build()
    };
    cookie.to_string()
}

fn page_href(state: &UrlState) -> String {
    let encoded = state.encode();
    if encoded.is_empty() {
        "/".to_string()
    } else {
        format!("/?{encoded}")
    }
}

fn sheet_href(state: &UrlState, sheet_open: bool) -> String {
    let href = page_href(state);
    match (sheet_open, href.contains('?')) {
        (false, _) => href,
        (true, true) => format!("{href}&{SHEET_PARAM}=open"),
        (true, false) => format!("{href}?{SHEET_PARAM}=open"),
    }
}

fn absolute_url(base_url: &str, state: &UrlState) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), page_href(state))
}

/// Hrefs for the page's controls, each the URL state after one command.
struct PageLinks {
    current: UrlState,
    sheet_open: bool,
}

impl PageLinks {
    fn href(&self, state: &UrlState) -> String {
        sheet_href(state, self.sheet_open)
    }

    fn sheet(&self, open: bool) -> String {
        sheet_href(&self.current, open)
    }

    fn toggle_category(&self, category: &str) -> String {
        let mut next = self.current.clone();
        next.filter.toggle_category(category);
        self.href(&next)
    }

    fn toggle_tag(&self, tag: &str) -> String {
        let mut next = self.current.clone();
        next.filter.toggle_tag(tag);
        self.href(&next)
    }

    fn open(&self, id: &str) -> String {
        self.href(&self.current.clone().with_id(id))
    }

    fn close(&self) -> String {
        self.href(&self.current.clone().without_id())
    }

    fn clear(&self) -> String {
        self.href(&UrlState::new(FilterState::new(), self.current.id.clone()))
    }
}

struct ChipLink {
    value: String,
    active: bool,
    href: String,
    title: String,
}

struct CardLink {
    card: CardView,
    href: String,
    tags: Vec<ChipLink>,
}

fn recipe_json_ld(recipe: &Recipe, base_url: &str) -> String {
    let url = absolute_url(base_url, &UrlState::default().with_id(recipe.id.clone()));
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": "Recipe",
        "@id": url,
        "url": url,
        "name": recipe.title,
        "recipeIngredient": recipe.ingredients,
        "recipeInstructions": recipe
            .instructions
            .iter()
            .map(|step| json!({ "@type": "HowToStep", "text": step }))
            .collect::<Vec<_>>(),
    });
    if let Some(category) = &recipe.category {
        value["recipeCategory"] = json!(category);
    }
    if !recipe.tags.is_empty() {
        value["keywords"] = json!(recipe.tags.join(", "));
    }
    if let Some(image) = &recipe.image {
        value["image"] = json!(image);
    }
    // `<` would let a title close the surrounding script element.
    serde_json::to_string_pretty(&value)
        .map(|text| text.replace('<', "\\u003c"))
        .unwrap_or_else(|_| "{}".to_string())
}

impl PageTemplate {
    fn new(controller: &Controller, base_url: &str) -> Self {
        let view = controller.view();
        let sheet = *controller.sheet();
        let links = PageLinks {
            current: controller.url_state(),
            sheet_open: sheet.is_visible(),
        };
        let chip = |value: &str, active: bool, href: String| ChipLink {
            value: value.to_string(),
            active,
            href,
            title: render::tag_filter_title(value),
        };
        let category_links = view
            .controls
            .categories
            .iter()
            .map(|c| chip(c.value.as_str(), c.active, links.toggle_category(&c.value)))
            .collect();
        let tag_links = view
            .controls
            .tags
            .iter()
            .map(|t| chip(t.value.as_str(), t.active, links.toggle_tag(&t.value)))
            .collect();
        let cards = view
            .cards
            .iter()
            .map(|card| CardLink {
                href: links.open(&card.id),
                tags: card
                    .tags
                    .iter()
                    .map(|tag| chip(tag.as_str(), view.filter.tags.contains(tag), links.toggle_tag(tag)))
                    .collect(),
                card: card.clone(),
            })
            .collect();
        let json_ld = controller
            .detail()
            .open_id()
            .and_then(|id| controller.load_state().store()?.get(id).cloned())
            .map(|recipe| recipe_json_ld(&recipe, base_url));
        let hidden_tags = (!view.filter.tags.is_empty()).then(|| join_tags(&view.filter.tags));
        let return_to = links.href(&links.current);
        Self {
            canonical_url: absolute_url(base_url, &links.current),
            json_ld,
            search_display: view.filter.search_display.clone(),
            hidden_category: view.filter.category.clone(),
            hidden_tags,
            category_links,
            tag_links,
            active_filters_html: view.active_filters_html(),
            summary_text: view.summary_text.clone(),
            clear_href: links.clear(),
            cards,
            grid_busy: view.grid.is_busy(),
            show_empty: view.grid.shows_empty_notice(),
            close_href: links.close(),
            sheet_open: sheet.aria_expanded(),
            sheet_overlay: sheet.scrim_visible(),
            filter_toggle_href: links.sheet(!sheet.is_visible()),
            filter_close_href: links.sheet(false),
            scroll_locked: view.scroll_locked,
            return_to,
            version: env!("CARGO_PKG_VERSION"),
            theme: view.theme,
            detail: view.detail,
        }
    }
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="sv" data-theme="{{ theme.mode }}">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{% if let Some(detail) = detail %}{{ detail.title }} • {% endif %}Receptbok</title>
    <link rel="stylesheet" href="/assets/style.css">
    <link rel="canonical" href="{{ canonical_url }}">
    {% if let Some(json_ld) = json_ld %}
    <script type="application/ld+json">
{{ json_ld|safe }}
    </script>
    {% endif %}
  </head>
  <body{% if scroll_locked %} class="no-scroll"{% endif %}>
    <header class="topbar">
      <a class="brand" href="/">Receptbok</a>
      <form method="get" action="/" class="search" role="search">
        <input id="search" type="search" name="q" value="{{ search_display }}" placeholder="Sök recept, ingredienser eller taggar" autocomplete="off">
        {% if let Some(category) = hidden_category %}<input type="hidden" name="cat" value="{{ category }}">{% endif %}
        {% if let Some(tags) = hidden_tags %}<input type="hidden" name="tags" value="{{ tags }}">{% endif %}
        <button type="submit">Sök</button>
      </form>
      <a id="filterToggle" class="filter-toggle" href="{{ filter_toggle_href }}" aria-controls="filters" aria-expanded="{{ sheet_open }}">Filter</a>
      <form method="post" action="/theme" class="theme-form">
        <input type="hidden" name="return_to" value="{{ return_to }}">
        <button id="themeToggle" type="submit" aria-pressed="{{ theme.aria_pressed }}" aria-label="{{ theme.title }}" title="{{ theme.title }}">{{ theme.label }}</button>
      </form>
    </header>

    <main>
      <section id="filters" aria-label="Filter" data-open="{{ sheet_open }}"{% if sheet_overlay %} data-overlay="true"{% endif %}>
        {% if sheet_open %}<a id="filterClose" class="sheet-close" href="{{ filter_close_href }}" aria-label="Stäng filter">×</a>{% endif %}
        <div id="catButtons" class="chips" role="tablist">
          {% for chip in category_links %}
          <a class="chip{% if chip.active %} active{% endif %}" role="tab" aria-selected="{{ chip.active }}" data-cat="{{ chip.value }}" href="{{ chip.href }}">{{ chip.value }}</a>
          {% endfor %}
        </div>
        <div id="tagChips" class="chips">
          {% for chip in tag_links %}
          <a class="chip{% if chip.active %} active{% endif %}" data-tag="{{ chip.value }}" title="{{ chip.title }}" href="{{ chip.href }}">{{ chip.value }}</a>
          {% endfor %}
        </div>
        <a class="clear" data-action="clear-filters" href="{{ clear_href }}">Rensa filter</a>
      </section>
      {% if sheet_open %}<a id="sheetScrim" class="sheet-scrim" href="{{ filter_close_href }}" aria-hidden="true" tabindex="-1"></a>{% endif %}

      <div class="status">
        <div id="activeFilters">{{ active_filters_html|safe }}</div>
        <p id="resultSummary" aria-live="polite">{{ summary_text }}</p>
      </div>

      <div id="grid" class="grid" aria-busy="{{ grid_busy }}">
        {% for entry in cards %}
        <article class="card" data-id="{{ entry.card.id }}">
          <a class="card-link" href="{{ entry.href }}" aria-label="{{ entry.card.aria_label }}">
            <div class="card-media">
              <img src="{{ entry.card.image }}" alt="{{ entry.card.title }}" loading="lazy" decoding="async">
              {% if let Some(category) = entry.card.category %}<span class="card-badge">{{ category }}</span>{% endif %}
            </div>
            <div class="card-header"><h3>{{ entry.card.title }}</h3></div>
          </a>
          {% if !entry.tags.is_empty() %}
          <div class="tag-row" role="list">
            {% for tag in entry.tags %}
            <a class="mini-tag{% if tag.active %} active{% endif %}" data-tag="{{ tag.value }}" title="{{ tag.title }}" href="{{ tag.href }}">{{ tag.value }}</a>
            {% endfor %}
          </div>
          {% endif %}
        </article>
        {% endfor %}
      </div>
      <p id="empty"{% if !show_empty %} hidden{% endif %}>Inga recept hittades. Prova att ändra sökningen eller rensa filtren.</p>
    </main>

    {% if let Some(detail) = detail %}
    <a class="scrim" href="{{ close_href }}" aria-hidden="true" tabindex="-1"></a>
    <dialog id="dlg" open data-open="true" aria-labelledby="dlgTitle">
      <a id="dlgClose" class="dlg-close" href="{{ close_href }}" aria-label="Stäng">×</a>
      <h2 id="dlgTitle">{{ detail.title }}</h2>
      <img id="dlgImg" src="{{ detail.image }}" alt="{{ detail.image_alt }}" loading="eager">
      <h3>Ingredienser</h3>
      <ul id="dlgIng">
        {% for item in detail.ingredients %}<li>{{ item }}</li>{% endfor %}
      </ul>
      <h3>Gör så här</h3>
      <ol id="dlgSteps">
        {% for step in detail.instructions %}<li>{{ step }}</li>{% endfor %}
      </ol>
      {% if let Some(tips) = detail.tips %}<p id="dlgTips" class="tips">{{ tips }}</p>{% endif %}
    </dialog>
    {% endif %}

    <footer class="muted">Receptbok v{{ version }}</footer>
  </body>
</html>"#,
    ext = "html"
)]
struct PageTemplate {
    theme: ThemeToggleView,
    canonical_url: String,
    json_ld: Option<String>,
    search_display: String,
    hidden_category: Option<String>,
    hidden_tags: Option<String>,
    category_links: Vec<ChipLink>,
    tag_links: Vec<ChipLink>,
    active_filters_html: String,
    summary_text: String,
    clear_href: String,
    cards: Vec<CardLink>,
    grid_busy: bool,
    show_empty: bool,
    detail: Option<DetailView>,
    close_href: String,
    sheet_open: bool,
    sheet_overlay: bool,
    filter_toggle_href: String,
    filter_close_href: String,
    scroll_locked: bool,
    return_to: String,
    version: &'static str,
}
