//! Leadscout main entry point
//!
//! Command-line runner for a single scrape: pick a site and fetch
//! strategy, watch per-page progress, and get the normalized listings as
//! a summary or as JSON.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use leadscout::config::load_config_with_hash;
use leadscout::pipeline::DedupeKey;
use leadscout::run::{JobOrchestrator, RunOptions};
use leadscout::{
    EngineConfig, FetchStrategy, ProgressEvent, ScrapeParams, ScrapeRunResult, SourceSite,
};
use tracing_subscriber::EnvFilter;

/// Leadscout: a job-listing acquisition engine
///
/// Scrapes one target job site for a keyword/location pair, drives
/// pagination politely, and prints clean, deduplicated listings.
#[derive(Parser, Debug)]
#[command(name = "leadscout")]
#[command(version)]
#[command(about = "Scrape job listings into clean lead records", long_about = None)]
struct Cli {
    /// Search keyword, e.g. "Software Engineer"
    #[arg(short, long)]
    keyword: String,

    /// Search location, e.g. "Bengaluru"
    #[arg(short, long)]
    location: String,

    /// Target site: indeed | naukri
    #[arg(long, default_value = "indeed")]
    site: String,

    /// Fetch strategy: http | browser
    #[arg(long, default_value = "http")]
    strategy: String,

    /// Number of result pages to request
    #[arg(short, long, default_value_t = 3)]
    pages: u32,

    /// Path to a TOML engine-settings file (defaults apply without one)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep paginating past per-page fetch errors instead of failing
    #[arg(long)]
    continue_on_error: bool,

    /// Dedup key: external-id | detail-url | both
    #[arg(long, default_value = "external-id")]
    dedupe_key: String,

    /// Emit the full run result as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load engine settings, or run on the built-in defaults
    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            tracing::info!("Engine settings loaded (hash: {})", hash);
            config
        }
        None => EngineConfig::default(),
    };

    let site: SourceSite = cli.site.parse().map_err(anyhow::Error::msg)?;
    let strategy: FetchStrategy = cli.strategy.parse().map_err(anyhow::Error::msg)?;
    let dedupe_key: DedupeKey = cli.dedupe_key.parse().map_err(anyhow::Error::msg)?;

    let params = ScrapeParams {
        keyword: cli.keyword.clone(),
        location: cli.location.clone(),
        max_pages: cli.pages,
    };

    let mut options = RunOptions::from_config(&config);
    options.continue_on_error = options.continue_on_error || cli.continue_on_error;
    options.dedupe_key = dedupe_key;

    let orchestrator = JobOrchestrator::new(config);

    // Stream page progress unless output must stay machine-readable
    let show_progress = !cli.json && !cli.quiet;
    let mut on_progress = move |event: ProgressEvent| {
        if show_progress {
            println!(
                "page {}/{}: {} listings so far",
                event.current_page, event.total_pages, event.cumulative_listings_found
            );
        }
    };

    let result = orchestrator
        .run(site, strategy, &params, &options, Some(&mut on_progress))
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&cli, &result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("leadscout=info,warn"),
            1 => EnvFilter::new("leadscout=debug,info"),
            2 => EnvFilter::new("leadscout=trace,debug"),
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

/// Prints the run outcome in a human-readable form
fn print_summary(cli: &Cli, result: &ScrapeRunResult) {
    let stats = &result.statistics;

    println!("\n=== Scrape Summary ===\n");
    println!("Query:");
    println!("  Keyword: {}", cli.keyword);
    println!("  Location: {}", cli.location);
    println!("  Site: {} ({})", cli.site, cli.strategy);
    println!();

    println!("Run:");
    println!("  Status: {}", result.status);
    println!("  Duration: {}ms", stats.duration_ms);
    println!(
        "  Requests: {} attempted, {} succeeded, {} failed",
        stats.requests_attempted, stats.requests_succeeded, stats.requests_failed
    );
    println!(
        "  Listings: {} extracted, {} duplicates removed, {} invalid dropped, {} final",
        stats.fragments_extracted,
        stats.duplicates_removed,
        stats.invalid_dropped,
        result.listings.len()
    );

    if !stats.errors.is_empty() {
        println!("\nErrors:");
        for error in &stats.errors {
            println!("  page {}: {} ({})", error.page, error.kind, error.url);
        }
    }

    if !result.listings.is_empty() {
        println!("\nListings:");
        for listing in &result.listings {
            println!(
                "  - {} | {} | {}",
                listing.title.as_deref().unwrap_or("(no title)"),
                listing.organization.as_deref().unwrap_or("(no company)"),
                listing.location_text.as_deref().unwrap_or("-")
            );
        }
    }
}
