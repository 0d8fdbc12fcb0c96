//! Mailmark main entry point
//!
//! Command-line interface: converts HTML documents to markdown and harvests
//! the pages and PDFs they link to.

use anyhow::Context;
use clap::Parser;
use mailmark::config::load_config_with_hash;
use mailmark::output::{sanitize_filename, unique_path};
use mailmark::Harvester;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Mailmark: a newsletter link harvester
///
/// Mailmark renders HTML documents (email bodies, saved pages) to markdown,
/// then fetches the web pages and PDF documents they link to, skipping
/// blocked domains, boilerplate link text, and already-visited URLs.
#[derive(Parser, Debug)]
#[command(name = "mailmark")]
#[command(version = "1.0.0")]
#[command(about = "A newsletter link harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// HTML files to render and harvest
    #[arg(value_name = "INPUT", required_unless_present = "dry_run")]
    inputs: Vec<PathBuf>,

    /// Override the configured output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Convert inputs to markdown without fetching any links
    #[arg(long)]
    render_only: bool,

    /// Validate config and show what would run without doing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.display().to_string();
    }

    if cli.dry_run {
        return handle_dry_run(&config, &cli.inputs);
    }

    let output_dir = PathBuf::from(&config.output.output_dir);
    let links_dir = output_dir.join(&config.output.links_subdir);
    std::fs::create_dir_all(&output_dir)?;
    if !cli.render_only {
        std::fs::create_dir_all(&links_dir)?;
    }

    // One harvester per run: the visited set spans all inputs
    let mut harvester = Harvester::new(config)?;

    for input in &cli.inputs {
        if let Err(e) = process_input(&mut harvester, input, &output_dir, &links_dir, cli.render_only).await {
            tracing::error!("Failed to process {}: {}", input.display(), e);
        }
    }

    Ok(())
}

/// Renders one input file and harvests its links
async fn process_input(
    harvester: &mut Harvester,
    input: &Path,
    output_dir: &Path,
    links_dir: &Path,
    render_only: bool,
) -> anyhow::Result<()> {
    tracing::info!("Processing: {}", input.display());

    let html = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let markdown = harvester.render_document(&html);

    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    let rendered_path = unique_path(output_dir, &sanitize_filename(stem), ".md");
    std::fs::write(&rendered_path, &markdown)?;
    tracing::info!("Saved: {}", rendered_path.display());

    if render_only {
        return Ok(());
    }

    let stats = harvester.process_markdown(&markdown, links_dir).await?;
    tracing::info!(
        "Harvested {}: {} pages, {} documents saved, {} rejected, {} duplicates",
        input.display(),
        stats.pages_saved,
        stats.documents_saved,
        stats.rejected,
        stats.duplicates_skipped
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailmark=info,warn"),
            1 => EnvFilter::new("mailmark=debug,info"),
            2 => EnvFilter::new("mailmark=trace,debug"),
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

/// Handles --dry-run: validates config and shows what would run
fn handle_dry_run(config: &mailmark::Config, inputs: &[PathBuf]) -> anyhow::Result<()> {
    println!("=== Mailmark Dry Run ===\n");

    println!("Fetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    if let Some(referer) = &config.fetch.referer {
        println!("  Referer: {}", referer);
    }
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!(
        "  429 retries: {} (delay {}s)",
        config.fetch.max_retries, config.fetch.retry_delay_secs
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
    println!("  Links subdirectory: {}", config.output.links_subdir);

    println!("\nBlocked domains ({}):", config.policy.blocked_domains.len());
    for domain in &config.policy.blocked_domains {
        println!("  - {}", domain);
    }

    println!(
        "\nExcluded link texts ({}):",
        config.policy.excluded_link_texts.len()
    );
    for phrase in &config.policy.excluded_link_texts {
        println!("  - {}", phrase);
    }

    println!("\nInputs ({}):", inputs.len());
    for input in inputs {
        println!("  - {}", input.display());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
