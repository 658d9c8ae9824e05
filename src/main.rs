//! Courseharvest main entry point
//!
//! Command-line interface for harvesting a course into a JSON document
//! list plus a diagnostic log.

use anyhow::Context;
use clap::Parser;
use courseharvest::config::load_config;
use courseharvest::extract::formats::ExtractorSet;
use courseharvest::harvester::CourseHarvester;
use courseharvest::state::LogLevel;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Courseharvest: course-content harvester
///
/// Walks a course's pages, announcements, assignments, files, modules and
/// syllabus, and writes the normalized documents as JSON.
#[derive(Parser, Debug)]
#[command(name = "courseharvest")]
#[command(version)]
#[command(about = "Harvest course content into normalized text documents", long_about = None)]
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

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Write harvested documents to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the structured run log after harvesting
    #[arg(long)]
    details: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.output.as_deref(), cli.details).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("courseharvest=info,warn"),
            1 => EnvFilter::new("courseharvest=debug,info"),
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

/// Handles --dry-run: validates config and shows what would be harvested
fn handle_dry_run(config: &courseharvest::HarvestConfig) {
    println!("=== Courseharvest Dry Run ===\n");

    println!("Course:");
    println!("  API URL: {}", config.course.api_url);
    println!("  Course ID: {}", config.course.course_id);

    println!("\nOptions:");
    println!(
        "  Index external URLs: {}",
        config.harvest.index_external_urls
    );
    println!(
        "  Load media captions: {}",
        config.harvest.load_media_captions
    );

    println!("\nEmbed hosts:");
    println!(
        "  UI hostname: {}",
        display_or_unset(&config.embeds.ui_hostname)
    );
    println!(
        "  Caption hostname: {}",
        display_or_unset(&config.embeds.caption_hostname)
    );

    println!("\n✓ Configuration is valid");
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Runs the harvest and writes documents as JSON
async fn handle_harvest(
    config: courseharvest::HarvestConfig,
    output: Option<&std::path::Path>,
    details: bool,
) -> anyhow::Result<()> {
    // Byte-format extractors are supplied by embedding applications; the
    // standalone CLI harvests the text-native categories and records the
    // rest as invalid files.
    let harvester = CourseHarvester::new(config, ExtractorSet::new(), None)
        .await
        .context("failed to open course")?;

    let documents = harvester.load().await;

    let json = serde_json::to_string_pretty(&documents)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✓ Wrote {} documents to {}", documents.len(), path.display());
        }
        None => println!("{}", json),
    }

    let (_, errors) = harvester.get_details(LogLevel::Info);
    if !errors.is_empty() {
        eprintln!("{} warning(s) during harvest", errors.len());
    }
    let invalid = harvester.invalid_files();
    if !invalid.is_empty() {
        eprintln!("Files without a registered extractor:");
        for entry in &invalid {
            eprintln!("  - {}", entry);
        }
    }

    if details {
        let (statements, _) = harvester.get_details(LogLevel::Debug);
        eprintln!("\n=== Run log ===");
        for statement in &statements {
            eprintln!("[{}] {}", statement.level, statement.message);
        }
    }

    Ok(())
}
