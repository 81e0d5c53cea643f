use anyhow::{Context, Result};
use appshelf::app::{App, AppEvent};
use appshelf::catalog::{CatalogView, Category, LoadStatus};
use appshelf::config::Config;
use appshelf::render::{render_catalog, PlainSurface};
use appshelf::source::{self, CatalogSource, DEFAULT_SOURCE};
use appshelf::ui;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/appshelf/)
fn get_config_dir() -> Result<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("appshelf"));
    }
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("appshelf"))
}

#[derive(Parser, Debug)]
#[command(
    name = "appshelf",
    version,
    about = "Browse a JSON app catalog with search-as-you-type and category filters"
)]
struct Args {
    /// Catalog location: http(s) URL or file path [default: ./data/apps.json]
    #[arg(long, value_name = "URI")]
    source: Option<String>,

    /// Config file [default: ~/.config/appshelf/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Load timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Color theme (dark or light)
    #[arg(long)]
    theme: Option<String>,

    /// Load once, print the matching apps to stdout and exit
    #[arg(long)]
    print: bool,

    /// Search term applied in --print mode
    #[arg(long, requires = "print")]
    search: Option<String>,

    /// Category applied in --print mode (all, game, short_play, news, general, unknown)
    #[arg(long, requires = "print")]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Without RUST_LOG the TUI stays silent so log lines cannot tear the
    // alternate screen; --print reports warnings.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.print { "warn" } else { "off" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // CLI flags override the config file
    if let Some(source) = &args.source {
        config.source = Some(source.clone());
    }
    if let Some(secs) = args.timeout {
        config.load_timeout_secs = secs;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    let raw_source = config.source.as_deref().unwrap_or(DEFAULT_SOURCE);
    let catalog_source = CatalogSource::parse(raw_source)
        .with_context(|| format!("Invalid catalog source '{}'", raw_source))?;
    tracing::info!(source = %catalog_source, "Using catalog source");

    if args.print {
        let category = match args.category.as_deref() {
            Some(name) => Category::parse_filter(name)?,
            None => None,
        };
        let ok = print_catalog(
            &catalog_source,
            config.load_timeout(),
            args.search.unwrap_or_default(),
            category,
        )
        .await?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut app = App::new(catalog_source, &config).context("Failed to create application")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

/// Load once and write the filtered catalog to stdout.
///
/// Returns `Ok(false)` when the load failed; the error is printed as part
/// of the output.
async fn print_catalog(
    catalog_source: &CatalogSource,
    timeout: Duration,
    search: String,
    category: Option<Category>,
) -> Result<bool> {
    let client = source::build_http_client().context("Failed to build HTTP client")?;

    let mut view = CatalogView::new();
    view.begin_load();
    view.finish_load(source::load(&client, catalog_source, timeout).await);
    view.set_filters(search, category);

    let mut surface = PlainSurface::new(std::io::stdout().lock());
    render_catalog(&view, &mut surface);
    surface
        .finish()
        .map(drop)
        .context("Failed to write catalog to stdout")?;

    Ok(view.load_status() == LoadStatus::Loaded)
}
