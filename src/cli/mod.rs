//! Command-line interface.

mod prompt;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::ScrapeError;
use crate::events::{EventSink, ScrapeEvent, TracingSink};
use crate::models::ChannelReport;
use crate::scrape;
use crate::storage;

pub use prompt::parse_count;

#[derive(Parser, Debug)]
#[command(name = "tubescrape")]
#[command(about = "Scrape a YouTube channel's metadata and most recent videos")]
#[command(version)]
pub struct Cli {
    /// Channel URL (prompted for when omitted)
    url: Option<String>,

    /// Number of most recent videos to collect (prompted for when omitted)
    count: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Load images, stylesheets and fonts
    #[arg(long)]
    no_block: bool,

    /// Directory reports are written to
    #[arg(long)]
    output_dir: Option<String>,

    /// Config file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report to stdout instead of saving it
    #[arg(long)]
    stdout: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line flags on top of file and environment settings.
    fn apply_overrides(&self, config: &mut Config) {
        if self.headed {
            config.browser.headless = false;
        }
        if self.no_block {
            config.browser.block_resources = false;
        }
        if let Some(dir) = &self.output_dir {
            config.scrape.output_dir = dir.clone();
        }
    }
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Mirrors scrape progress onto the spinner while still logging it.
struct SpinnerSink {
    bar: ProgressBar,
}

impl EventSink for SpinnerSink {
    fn emit(&self, event: ScrapeEvent) {
        match &event {
            ScrapeEvent::SearchingMetadata => {
                self.bar.set_message("Searching for key information...")
            }
            ScrapeEvent::SearchingVideos { target } => self
                .bar
                .set_message(format!("Searching for last {} videos...", target)),
            ScrapeEvent::Scrolled { items, .. } => self
                .bar
                .set_message(format!("Loading videos... {} found", items)),
            _ => {}
        }
        TracingSink.emit(event);
    }
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .await
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().await,
    };
    tracing::info!("Using {}", config_origin(&config));
    cli.apply_overrides(&mut config);
    Ok(config)
}

fn config_origin(config: &Config) -> String {
    match &config.source_path {
        Some(path) => format!("config file {}", path.display()),
        None => "built-in defaults".to_string(),
    }
}

/// Attach a hint to deadline failures pointing at the setting to raise.
fn explain_failure(err: ScrapeError, channel_url: &str) -> anyhow::Error {
    let hint = err.is_deadline().then_some(
        "the page was too slow; raise the matching *_deadline_secs under [scrape]",
    );
    let err = anyhow::Error::new(err).context(format!("Failed to scrape {}", channel_url));
    match hint {
        Some(hint) => err.context(hint),
        None => err,
    }
}

/// Number of videos missing at least one field.
fn incomplete_records(report: &ChannelReport) -> usize {
    report.videos.iter().filter(|v| !v.is_complete()).count()
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    let channel_url = match &cli.url {
        Some(url) => url.clone(),
        None => prompt::ask_stdin("Please, type the channel url: ")?,
    };
    let raw_count = match &cli.count {
        Some(count) => count.clone(),
        None => prompt::ask_stdin("Please, type quantity of the last videos you want: ")?,
    };
    let count = parse_count(&raw_count).map_err(anyhow::Error::msg)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(format!("Opening {}...", channel_url));

    let sink = SpinnerSink { bar: pb.clone() };
    let result = scrape::run(&config, &channel_url, count, &sink).await;
    pb.finish_and_clear();
    let report = result.map_err(|e| explain_failure(e, &channel_url))?;

    if report.main.is_none() {
        println!("{} Channel not found", style("!").yellow());
    }
    let incomplete = incomplete_records(&report);
    if incomplete > 0 {
        println!(
            "{} {} of {} videos are missing fields",
            style("!").yellow(),
            incomplete,
            report.videos.len()
        );
    }

    if cli.stdout {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let dir = config.output_dir(&cwd);
    let path = storage::save_report(&dir, &report)
        .await
        .with_context(|| format!("Failed to save report to {}", dir.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!("{}", style(format!("{} saved.", file_name)).green());

    Ok(())
}
