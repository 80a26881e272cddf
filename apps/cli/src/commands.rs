//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use url::Url;
use workfind_core::{SearchState, build_index_with_progress};
use workfind_fetcher::{FetchOptions, FetchProgress, SourceFetcher};
use workfind_shared::{
    AppConfig, SourceDescriptor, WorkRecord, WorkType, init_config, load_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// workfind: search the works published by your sites.
#[derive(Parser)]
#[command(
    name = "workfind",
    version,
    about = "Aggregate Schema.org feeds from several sites and search them.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.workfind/workfind.toml.
    #[arg(long, global = true, env = "WORKFIND_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Where to read sources from, shared by the commands that fetch.
#[derive(clap::Args)]
pub(crate) struct SourceArgs {
    /// Extra source as NAME=URL (repeatable); added to the configured ones.
    #[arg(long = "source", value_parser = parse_source_arg)]
    pub extra: Vec<SourceDescriptor>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch all sources and print the works matching the filters.
    Search {
        /// Free-text query matched against titles and descriptions.
        query: Option<String>,

        /// Only show works from these sites (repeatable). Defaults to all.
        #[arg(long = "site")]
        sites: Vec<String>,

        /// Only show works of these Schema.org types (repeatable). Defaults to all.
        #[arg(long = "type")]
        types: Vec<WorkType>,

        /// Print the works as a JSON array.
        #[arg(long)]
        json: bool,

        /// Show at most this many works.
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Fetch all sources and list the sites and types found.
    Facets {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// List the configured sources.
    Sources,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Parse `NAME=URL` into a source descriptor.
fn parse_source_arg(raw: &str) -> std::result::Result<SourceDescriptor, String> {
    let (name, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=URL, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("source name is empty in '{raw}'"));
    }
    let url = Url::parse(url.trim()).map_err(|e| format!("invalid URL in '{raw}': {e}"))?;
    Ok(SourceDescriptor::new(name, url))
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "workfind=info",
        1 => "workfind=debug",
        _ => "workfind=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Search {
            query,
            sites,
            types,
            json,
            limit,
            sources,
        } => {
            let filters = SearchFilters {
                query: query.unwrap_or_default(),
                sites,
                types,
            };
            cmd_search(&config, sources, &filters, json, limit).await
        }
        Command::Facets { sources } => cmd_facets(&config, sources).await,
        Command::Sources => cmd_sources(&config),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Index construction
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl FetchProgress for CliProgress {
    fn source_started(&self, name: &str) {
        self.spinner.set_message(format!("Fetching {name}"));
    }

    fn source_finished(&self, name: &str, ok: bool, completed: usize, total: usize) {
        let outcome = if ok { "loaded" } else { "failed" };
        self.spinner
            .set_message(format!("[{completed}/{total}] {name} {outcome}"));
    }
}

/// Fetch configured + extra sources and build the search state.
async fn load_index(config: &AppConfig, extra: SourceArgs) -> Result<SearchState> {
    let mut sources = config.sources.clone();
    sources.extend(extra.extra);

    if sources.is_empty() {
        return Err(eyre!(
            "no sources configured. Add [[sources]] to the config file or pass --source NAME=URL"
        ));
    }

    for source in &sources {
        if let Err(e) = Url::parse(&source.url) {
            warn!(site = %source.name, url = %source.url, error = %e, "source URL looks invalid");
        }
    }

    let fetcher = SourceFetcher::new(&FetchOptions::from(&config.fetch))?;
    let progress = CliProgress::new();
    let state = build_index_with_progress(&fetcher, &sources, &progress).await;
    progress.finish();

    report_failures(&state);
    Ok(state)
}

fn report_failures(state: &SearchState) {
    let fails = state.fetch_fails();
    if fails.is_empty() {
        return;
    }
    let noun = if fails.len() == 1 { "source" } else { "sources" };
    eprintln!(
        "  {} {noun} could not be loaded: {}",
        fails.len(),
        fails.join(", ")
    );
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

struct SearchFilters {
    query: String,
    sites: Vec<String>,
    types: Vec<WorkType>,
}

/// Apply command-line filters to a freshly built state.
fn apply_filters(state: &mut SearchState, filters: &SearchFilters) {
    if !filters.sites.is_empty() {
        for site in &filters.sites {
            if !state.meta().sites.contains(site) {
                warn!(site = %site, "no works found for site");
            }
        }
        state.select_only_sites(&filters.sites);
    }
    if !filters.types.is_empty() {
        state.select_only_types(filters.types.iter().copied());
    }
    state.set_string_filter(filters.query.as_str());
}

async fn cmd_search(
    config: &AppConfig,
    sources: SourceArgs,
    filters: &SearchFilters,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut state = load_index(config, sources).await?;
    apply_filters(&mut state, filters);

    let mut works = state.filter_works();
    info!(
        total = state.works().len(),
        matched = works.len(),
        query = %state.string_filter(),
        "search complete"
    );
    if let Some(limit) = limit {
        works.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&works)?);
        return Ok(());
    }

    if works.is_empty() {
        println!("  No works match.");
        return Ok(());
    }

    println!();
    for work in &works {
        print_work(work);
    }
    println!("  {} of {} works", works.len(), state.works().len());
    println!();

    Ok(())
}

fn print_work(work: &WorkRecord) {
    let date = work
        .published()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .or_else(|| work.date.clone())
        .unwrap_or_else(|| "----------".to_string());

    println!("  {date}  {:<12}  {:<12}  {}", work.work_type, work.site, work.name);
    if let Some(url) = &work.url {
        println!("  {:<10}  {url}", "");
    }
}

async fn cmd_facets(config: &AppConfig, sources: SourceArgs) -> Result<()> {
    let state = load_index(config, sources).await?;

    println!();
    println!("  Sites:");
    for site in &state.meta().sites {
        let count = state.works().iter().filter(|w| &w.site == site).count();
        println!("    {site:<20} {count}");
    }
    println!("  Types:");
    for work_type in &state.meta().types {
        let count = state
            .works()
            .iter()
            .filter(|w| w.work_type == *work_type)
            .count();
        println!("    {:<20} {count}", work_type.as_str());
    }
    println!();

    Ok(())
}

fn cmd_sources(config: &AppConfig) -> Result<()> {
    if config.sources.is_empty() {
        println!("  No sources configured.");
        return Ok(());
    }
    for source in &config.sources {
        println!("  {:<20} {}", source.name, source.url);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
