//! Reel-Harvest main entry point
//!
//! This is the command-line interface for the Reel-Harvest catalogue harvester.

use clap::{Parser, ValueEnum};
use reel_harvest::config::{load_config_with_hash, Config, CrawlOrder};
use reel_harvest::crawler::{harvest, listing_url, CrawlPlan, HarvestMode};
use reel_harvest::output::{load_statistics, print_run_summary, print_statistics};
use reel_harvest::storage::open_store;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Reel-Harvest: a paced catalogue harvester
///
/// Reel-Harvest walks the listing pages of one catalogue site, stores a
/// record per new detail page, and can re-visit stored records to refresh
/// their download links.
#[derive(Parser, Debug)]
#[command(name = "reel-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paced catalogue harvester", long_about = None)]
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

    /// Re-fetch stored items and replace their download links
    #[arg(long, conflicts_with_all = ["stats", "dry_run"])]
    refresh: bool,

    /// Show statistics from the store and exit
    #[arg(long, conflicts_with_all = ["refresh", "dry_run"])]
    stats: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["refresh", "stats"])]
    dry_run: bool,

    /// Listing page order, overriding the config
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// First listing page to visit, overriding the config
    #[arg(long, value_name = "PAGE")]
    start_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Forward,
    Reverse,
}

impl From<OrderArg> for CrawlOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Forward => CrawlOrder::Forward,
            OrderArg::Reverse => CrawlOrder::Reverse,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let plan = CrawlPlan::new(
        cli.order.map(CrawlOrder::from).unwrap_or(config.site.order),
        config.site.total_pages,
        cli.start_page.or(config.site.start_page),
    );

    if cli.dry_run {
        handle_dry_run(&config, &plan);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.refresh {
        handle_harvest(&config, HarvestMode::Refresh, &config_hash).await?;
    } else {
        handle_harvest(&config, HarvestMode::Crawl(plan), &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_harvest=info,warn"),
            1 => EnvFilter::new("reel_harvest=debug,info"),
            2 => EnvFilter::new("reel_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the configuration and crawl plan
fn handle_dry_run(config: &Config, plan: &CrawlPlan) {
    println!("=== Reel-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.origin());
    println!("  Total pages: {}", config.site.total_pages);
    println!(
        "  Plan: {} from page {} ({} pages)",
        plan.order(),
        plan.start_page(),
        plan.page_count()
    );
    if let Some(first) = plan.pages().next() {
        println!("  First listing: {}", listing_url(config.site.origin(), first));
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!(
        "  Referer: {}",
        config.http.referer.as_deref().unwrap_or("(none)")
    );
    println!("  Minimum body length: {} bytes", config.http.min_body_length);

    println!("\nPacing:");
    println!("  Between items: {}ms", config.pacing.item_delay_ms);
    println!("  Between pages: {}ms", config.pacing.page_delay_ms);

    println!("\nStore:");
    println!(
        "  Database: {}",
        config.store.database_path.as_deref().unwrap_or("(unset)")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the store
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.store.database_path.as_deref().unwrap_or_default();
    println!("Database: {}\n", path);

    let store = open_store(Path::new(path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);
    store.close()?;

    Ok(())
}

/// Handles a crawl or refresh run
async fn handle_harvest(
    config: &Config,
    mode: HarvestMode,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match harvest(config, mode, config_hash).await {
        Ok(totals) => {
            print_run_summary(mode.run_mode(), &totals);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
