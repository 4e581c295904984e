//! Article Harvester main entry point
//!
//! This is the command-line interface for the Article Harvester crawler.

use article_harvester::config::{load_config_with_hash, Config};
use article_harvester::crawler::user_agent_string;
use article_harvester::harvest;
use article_harvester::output::print_report;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Article Harvester: a polite single-pass article crawler
///
/// Crawls breadth-first from a seed page, extracts a title and a short
/// content preview from every article, and delivers the whole batch to a
/// sink endpoint in one request.
#[derive(Parser, Debug)]
#[command(name = "article-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-pass article crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without any network traffic
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("article_harvester=info,warn"),
            1 => EnvFilter::new("article_harvester=debug,info"),
            2 => EnvFilter::new("article_harvester=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Article Harvester Dry Run ===\n");

    println!("Crawler:");
    println!("  Seed: {}", config.crawler.seed_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Timeout: {}ms", config.crawler.timeout_ms);

    println!("\nExtraction:");
    println!("  Title selector: {}", config.extract.title_selector);
    println!("  Content selector: {}", config.extract.content_selector);
    println!("  Link prefix: {}", config.extract.link_prefix);
    println!("  Max links per page: {}", config.extract.max_links_per_page);
    println!("  Language: {}", config.extract.language);

    println!("\nUser Agent: {}", user_agent_string(&config.user_agent));

    println!("\nSink:");
    println!("  Endpoint: {}", config.sink.endpoint);
    let credential = if config.sink.resolve_api_key().is_some() {
        "present"
    } else {
        "MISSING"
    };
    println!(
        "  Credential: {} (inline or ${})",
        credential, config.sink.api_key_env
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Start URL: {}", config.crawler.seed_url);
    tracing::info!("Max pages: {}", config.crawler.max_pages);

    let report = match harvest(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    match report.upload {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
