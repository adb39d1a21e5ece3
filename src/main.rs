//! Kniss-Harvest main entry point
//!
//! This is the command-line interface for the Kniss-Harvest listing harvester.

use anyhow::Context;
use clap::Parser;
use kniss_harvest::config::{hash_config, load_config_or_default, validate_config, Config};
use kniss_harvest::crawler::crawl;
use kniss_harvest::output::{
    load_statistics, print_report, print_statistics, JsonLinesSink, MultiSink, RecordSink,
    SqliteSink,
};
use kniss_harvest::query::QueryRequest;
use kniss_harvest::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Kniss-Harvest: a paced listing harvester
///
/// Kniss-Harvest pages through the marketplace's search API one page at a
/// time, flattens each listing into a record, and writes the records as
/// JSON Lines and/or to a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "kniss-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paced listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the maximum number of pages to request
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the category slug to search
    #[arg(long, value_name = "SLUG")]
    category: Option<String>,

    /// Write records as JSON Lines to this file
    #[arg(long, value_name = "PATH")]
    jsonl: Option<PathBuf>,

    /// Store records in this SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Validate config and print the first request without sending it
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    let mut config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    apply_overrides(&mut config, &cli);
    validate_config(&config).context("Invalid command-line override")?;
    let config_hash = hash_config(&config).context("Failed to hash configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so records can be streamed on stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kniss_harvest=info,warn"),
            1 => EnvFilter::new("kniss_harvest=debug,info"),
            2 => EnvFilter::new("kniss_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.search.max_pages = max_pages;
    }
    if let Some(category) = &cli.category {
        config.search.category_slug = category.clone();
    }
    if let Some(path) = &cli.jsonl {
        config.output.jsonl_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.database {
        config.output.database_path = Some(path.display().to_string());
    }
}

/// Handles the --dry-run mode: validates config and shows the first request
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Kniss-Harvest Dry Run ===\n");

    println!("Endpoint:");
    println!("  URL: {}", config.endpoint.url);
    println!("  User agent: {}", config.endpoint.user_agent);
    println!("  Timeout: {}s", config.endpoint.timeout_secs);

    println!("\nSearch:");
    println!("  Category: {}", config.search.category_slug);
    println!("  Page size: {}", config.search.page_size);
    println!("  Max pages: {}", config.search.max_pages);
    println!("  Media size: {}", config.search.media_size);

    println!("\nPacing:");
    println!(
        "  Delay between requests: {}-{}ms",
        config.pacing.min_delay_ms, config.pacing.max_delay_ms
    );

    println!("\nOutput:");
    println!(
        "  JSON Lines: {}",
        config.output.jsonl_path.as_deref().unwrap_or("(stdout)")
    );
    println!(
        "  Database: {}",
        config.output.database_path.as_deref().unwrap_or("(none)")
    );

    let request = QueryRequest::for_page(config, 1);
    let body = serde_json::to_string_pretty(&request.body)
        .context("Failed to encode request body")?;
    println!("\nPage 1 request body:");
    println!("{}", body);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would request up to {} pages of {} listings",
        config.search.max_pages, config.search.page_size
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let database_path = config
        .output
        .database_path
        .as_deref()
        .context("--stats needs a database path (--database or [output] database-path)")?;

    println!("Database: {}\n", database_path);

    let storage = open_storage(Path::new(database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let mut sinks = MultiSink::new();
    let mut records_on_stdout = false;

    if let Some(path) = &config.output.jsonl_path {
        tracing::info!("Writing JSON Lines to {}", path);
        let sink = JsonLinesSink::create(Path::new(path))
            .with_context(|| format!("Failed to create {}", path))?;
        sinks.push(Box::new(sink));
    }

    if let Some(path) = &config.output.database_path {
        tracing::info!("Storing listings in {}", path);
        let storage = open_storage(Path::new(path))?;
        let sink = SqliteSink::start(storage, config_hash, &config.search.category_slug)?;
        sinks.push(Box::new(sink));
    }

    if sinks.is_empty() {
        sinks.push(Box::new(JsonLinesSink::stdout()));
        records_on_stdout = true;
    }

    let sink: &mut dyn RecordSink = &mut sinks;
    match crawl(config, sink).await {
        Ok(report) => {
            if !records_on_stdout {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
