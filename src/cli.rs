use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atty::Stream;
use clap::{Args, Parser, Subcommand};
use receptbok_rs::render::CardView;
use receptbok_rs::{
    Controller, DEFAULT_DATA_PATH, DetailView, FilterState, LoadState, RecipeStore, UrlState,
    Viewport,
};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};

#[derive(Parser, Debug)]
#[command(name = "receptbok", about = "Browse and filter the recipe collection", version)]
pub struct Cli {
    /// Path to the recipe JSON file.
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Emit JSON instead of human-readable tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recipes matching a filter.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Start from an encoded URL state instead of the flags.
        #[arg(long, conflicts_with_all = ["search", "category", "tags"])]
        fragment: Option<String>,
    },
    /// Show the full recipe for an id.
    Show {
        id: String,
    },
    /// Encode or decode URL state.
    #[command(subcommand)]
    Fragment(FragmentCommand),
    /// Run the HTTP front end.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
        /// Public base URL used for canonical links and the sitemap.
        #[arg(long)]
        base_url: Option<String>,
        /// Keep the theme choice across browser sessions.
        #[arg(long)]
        persist_theme: bool,
    },
}

#[derive(Subcommand, Debug)]
enum FragmentCommand {
    /// Build a fragment from filter flags.
    Encode {
        #[command(flatten)]
        filter: FilterArgs,
        /// Open recipe id.
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the state carried by a fragment.
    Decode {
        fragment: String,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Free-text search over titles, ingredients and tags.
    #[arg(short, long)]
    search: Option<String>,
    /// Exact category.
    #[arg(short, long)]
    category: Option<String>,
    /// Tag to include; repeat for several (any of them matches).
    #[arg(short, long = "tag")]
    tags: Vec<String>,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        FilterState::new()
            .with_search(self.search.as_deref().unwrap_or_default())
            .with_category(self.category.unwrap_or_default())
            .with_tags(self.tags)
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::List { filter, fragment } => {
            let fragment = fragment
                .unwrap_or_else(|| UrlState::new(filter.into_state(), None).encode());
            handle_list(&cli.data, &fragment, cli.json)
        }
        Command::Show { id } => handle_show(&cli.data, &id, cli.json),
        Command::Fragment(FragmentCommand::Encode { filter, id }) => {
            handle_encode(UrlState::new(filter.into_state(), id), cli.json)
        }
        Command::Fragment(FragmentCommand::Decode { fragment }) => {
            handle_decode(&fragment, cli.json)
        }
        #[cfg(feature = "web")]
        Command::Serve {
            addr,
            base_url,
            persist_theme,
        } => handle_serve(cli.data, addr, base_url, persist_theme),
    }
}

fn load_store(path: &Path) -> Result<Arc<RecipeStore>, Box<dyn Error>> {
    Ok(Arc::new(RecipeStore::load(path)?))
}

fn handle_list(data: &Path, fragment: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let store = load_store(data)?;
    let controller = Controller::loaded(LoadState::Ready(store), fragment, Viewport::default());
    let view = controller.view();

    if as_json {
        let payload = json!({
            "fragment": view.fragment,
            "summary": view.summary_text,
            "active_filters": view.active_filters.iter().map(|p| &p.label).collect::<Vec<_>>(),
            "results": view.cards,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", view.summary_text);
        print_card_table(&view.cards);
    }
    Ok(())
}

fn handle_show(data: &Path, id: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let store = load_store(data)?;
    let recipe = store
        .get(id)
        .ok_or_else(|| format!("No recipe found for id {id:?}"))?;
    let detail = DetailView::from_recipe(recipe);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{} ({})", detail.title, detail.id);
    if let Some(category) = &recipe.category {
        println!("Kategori: {category}");
    }
    if !recipe.tags.is_empty() {
        println!("Taggar: {}", recipe.tags.join(", "));
    }
    render_markdown_block("Ingredienser", &bullet_list(&detail.ingredients));
    render_markdown_block("Gör så här", &numbered_list(&detail.instructions));
    if let Some(tips) = &detail.tips {
        render_markdown_block("Tips", tips);
    }
    Ok(())
}

fn handle_encode(state: UrlState, as_json: bool) -> Result<(), Box<dyn Error>> {
    let fragment = state.encode();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({ "fragment": fragment }))?);
    } else {
        println!("#{fragment}");
    }
    Ok(())
}

fn handle_decode(fragment: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let state = UrlState::decode(fragment);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }
    let filter = &state.filter;
    println!("search:   {}", display_or_dash(&filter.search_display));
    println!(
        "category: {}",
        display_or_dash(filter.category.as_deref().unwrap_or_default())
    );
    let tags = filter.tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    println!("tags:     {}", display_or_dash(&tags));
    println!("id:       {}", display_or_dash(state.id.as_deref().unwrap_or_default()));
    Ok(())
}

#[cfg(feature = "web")]
fn handle_serve(
    data: PathBuf,
    addr: std::net::SocketAddr,
    base_url: Option<String>,
    persist_theme: bool,
) -> Result<(), Box<dyn Error>> {
    use receptbok_rs::web::{self, WebConfig};

    web::init_tracing();
    let config = WebConfig {
        addr,
        base_url: base_url.unwrap_or_else(|| format!("http://{addr}")),
        data_path: data,
        persist_theme,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(web::serve(config))?;
    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn print_card_table(cards: &[CardView]) {
    if cards.is_empty() {
        return;
    }
    let id_width = cards
        .iter()
        .map(|card| card.id.chars().count())
        .max()
        .unwrap_or(2)
        .max("ID".len());
    let title_width = cards
        .iter()
        .map(|card| card.title.chars().count())
        .max()
        .unwrap_or(5)
        .max("TITLE".len());
    println!(
        "{:<id_width$}  {:<title_width$}  {:<12}  {}",
        "ID", "TITLE", "CATEGORY", "TAGS"
    );
    println!("{:-<id_width$}  {:-<title_width$}  {:-<12}  ----", "", "", "");
    for card in cards {
        println!(
            "{:<id_width$}  {:<title_width$}  {:<12}  {}",
            card.id,
            card.title,
            card.category.as_deref().unwrap_or("-"),
            card.tags.join(", ")
        );
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("* {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("{}. {item}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
