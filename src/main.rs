mod config;
mod error;
mod fetch;
mod output;
mod parser;
mod pipeline;
mod progress;
mod record;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Overrides, Settings};
use fetch::HttpSource;
use pipeline::Pipeline;
use progress::Suspended;

#[derive(Parser)]
#[command(
    name = "bseu_staff",
    about = "Parses Belarus State Economic University's staff list"
)]
struct Cli {
    /// Write results to this JSON file
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Suppress all logs
    #[arg(short, long)]
    quiet: bool,

    /// Log every fetched record; no effect with --quiet
    #[arg(short, long)]
    verbose: bool,

    /// Indent the JSON file and the logged records
    #[arg(long)]
    pretty: bool,

    /// Staff index page [env: BSEU_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Prepended to profile links and photo paths [env: BSEU_PROFILE_PREFIX]
    #[arg(long)]
    prefix: Option<String>,

    /// Profiles fetched in parallel [env: BSEU_JOBS]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Skip profiles that fail instead of aborting the run
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        progress_bar()?
    };
    init_tracing(&cli, &progress);

    let t0 = Instant::now();
    let settings = Settings::load(&Overrides {
        base_url: cli.base_url.clone(),
        profile_prefix: cli.prefix.clone(),
        jobs: cli.jobs,
        keep_going: cli.keep_going,
    })
    .context("Failed to load settings")?;

    let source = Arc::new(HttpSource::new()?);
    let report = Pipeline::new(settings, source)
        .context("Invalid settings")?
        .with_progress(progress)
        .pretty_records(cli.pretty)
        .run()
        .await
        .context("Scrape aborted")?;

    if let Some(path) = &cli.file {
        output::write_file(path, &report.records, cli.pretty)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        "Collected {} of {} staff members",
        report.records.len(),
        report.links
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    if !report.failures.is_empty() {
        anyhow::bail!(
            "{} of {} profiles failed",
            report.failures.len(),
            report.links
        );
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise the level follows --quiet / --verbose.
/// Log lines are written with the progress bar cleared so they don't tear it.
fn init_tracing(cli: &Cli, progress: &ProgressBar) {
    let fallback = if cli.quiet {
        "off".to_string()
    } else if cli.verbose {
        format!("{}=debug", env!("CARGO_CRATE_NAME"))
    } else {
        format!("{}=info", env!("CARGO_CRATE_NAME"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_target(false)
        .with_writer(Suspended::new(progress.clone(), std::io::stdout))
        .init();
}

fn progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
