//! Link-Ripple main entry point
//!
//! This is the command-line interface for the Link-Ripple link mapper.

use clap::Parser;
use link_ripple::config::{read_config_with_hash, validate, Config};
use link_ripple::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link-Ripple: a depth-bounded link mapper
///
/// Link-Ripple fetches a page, prints every usable link on it, then follows
/// those links depth-first until the depth limit is reached. Each line is
/// indented with one tab per level.
#[derive(Parser, Debug)]
#[command(name = "link-ripple")]
#[command(version)]
#[command(about = "A depth-bounded link mapper", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured maximum depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);
    tracing::debug!("{:?}", cli);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    match crawl(config, &cli.url).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only discovered links.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_ripple=info,warn"),
            1 => EnvFilter::new("link_ripple=debug,info"),
            2 => EnvFilter::new("link_ripple=trace,debug"),
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

/// Builds the effective configuration from the optional file and CLI overrides
fn load_configuration(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)?;
            tracing::info!("Configuration read (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }

    // Validated once, after overrides, so `--max-depth` can fix the file value
    validate(&config)?;
    Ok(config)
}
