//! Larodan scraper main entry point
//!
//! This is the command-line interface for the product catalog harvester.

use anyhow::Context;
use clap::Parser;
use larodan_scraper::config::{load_config_with_hash, validate, Config};
use larodan_scraper::crawler::run_crawl;
use larodan_scraper::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Larodan product scraper
///
/// Walks a product category listing, visits every product page and writes
/// the collected catalog, structure diagrams included, to disk.
#[derive(Parser, Debug)]
#[command(name = "larodan-scraper")]
#[command(version)]
#[command(about = "Larodan product scraper", long_about = None)]
struct Cli {
    /// Number of concurrent crawlers
    #[arg(short = 'c', long = "concurrency", value_name = "N")]
    concurrency: Option<u32>,

    /// Base URL for scraping (first listing page)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the products document
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show it without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Starting crawl of {} with {} concurrent crawlers",
        config.crawler.base_url,
        config.crawler.concurrency
    );

    match run_crawl(config).await {
        Ok(stats) => {
            tracing::info!("Process completed. Results saved in {}", stats.output_path);
            if !cli.quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("larodan_scraper=info,warn"),
            1 => EnvFilter::new("larodan_scraper=debug,info"),
            2 => EnvFilter::new("larodan_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(url) = &cli.url {
        config.crawler.base_url = url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.products_file = output.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Larodan Scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Concurrent crawlers: {}", config.crawler.concurrency);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    if config.crawler.accept_invalid_certs {
        println!("  TLS certificate verification: DISABLED");
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Products: {}", config.output.products_file);
    println!("  Images: {}", config.output.images_dir);
    println!("  Scratch: {}", config.output.scratch_dir);

    println!("\n✓ Configuration is valid");
}
