use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use pagefeed_core::{
    FetchConfig, JsonConfig, LinkFilter, RunSummary, SourceConfig, check_override, convert_to_json, fetch_file,
    fetch_url, load_sources, process_sources, select_sources,
};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate RSS feeds from blog listing pages
#[derive(Parser, Debug)]
#[command(name = "pagefeed")]
#[command(author = "Pagefeed Contributors")]
#[command(version)]
#[command(about = "Generate RSS feeds from blog listing pages", long_about = None)]
struct Args {
    /// Sources config file (JSON)
    #[arg(long, default_value = "config/sources.json", value_name = "PATH")]
    config: PathBuf,

    /// Only process the source with this id
    #[arg(long, value_name = "ID")]
    source_id: Option<String>,

    /// Read the listing page from a local HTML file instead of fetching
    #[arg(long, value_name = "PATH")]
    html_file: Option<PathBuf>,

    /// Build feeds without writing them
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,pagefeed=debug,pagefeed_core=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads and validates every selected source before any of them runs.
fn load_config(args: &Args) -> anyhow::Result<Vec<SourceConfig>> {
    let sources = load_sources(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;
    let sources = select_sources(sources, args.source_id.as_deref()).context("Failed to select sources")?;

    for source in &sources {
        LinkFilter::new(source).with_context(|| format!("Invalid URL patterns for source {}", source.id))?;
    }
    check_override(&sources, args.html_file.as_deref()).context("Invalid --html-file")?;

    Ok(sources)
}

fn load_page(runtime: &Runtime, source: &SourceConfig, html_file: Option<&Path>) -> pagefeed_core::Result<String> {
    match html_file {
        Some(path) => fetch_file(path),
        None => runtime.block_on(fetch_url(&source.url, &FetchConfig::from(source))),
    }
}

fn report(summary: &RunSummary, args: &Args) -> anyhow::Result<()> {
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(feed) if args.dry_run => {
                echo::print_info(&format!(
                    "{}: {} items -> {} (dry run)",
                    outcome.source_id,
                    feed.items.len(),
                    feed.output.display()
                ));
                if args.verbose {
                    let preview = convert_to_json(&feed.source_id, &feed.items, &JsonConfig { pretty: true })
                        .context("Failed to render JSON preview")?;
                    println!("{preview}");
                }
            }
            Ok(feed) => echo::print_success(&format!(
                "{}: wrote {} items to {} ({})",
                outcome.source_id,
                feed.items.len(),
                feed.output.display().bright_white(),
                echo::format_size(feed.xml.len())
            )),
            Err(e) => echo::print_error(&format!("{}: {e}", outcome.source_id)),
        }
    }

    if args.verbose {
        echo::print_run_summary(summary.succeeded(), summary.failed());
    } else if !summary.is_success() {
        echo::print_warning(&format!(
            "{} of {} sources failed",
            summary.failed(),
            summary.outcomes.len()
        ));
    }

    Ok(())
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    if args.verbose {
        echo::print_step(1, 2, &format!("Loading sources from {}", args.config.display()));
    }
    let sources = load_config(args)?;

    if args.verbose {
        echo::print_step(2, 2, &format!("Processing {} source(s)", sources.len()));
    }
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let summary = process_sources(
        &sources,
        |source| load_page(&runtime, source, args.html_file.as_deref()),
        args.dry_run,
    );

    report(&summary, args)?;
    Ok(summary)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
    }

    match run(&args) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            echo::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
