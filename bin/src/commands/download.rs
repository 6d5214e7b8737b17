//! Download command implementation.
//!
//! Runs a batch over a date range, one file per day, and prints a summary.

use anyhow::{Context, Result};
use chatlog_lib::prelude::*;
use chatlog_lib::url::DEFAULT_BASE_URL;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for `chatlog download`.
#[derive(Args, Debug)]
pub(crate) struct DownloadArgs {
    /// Channel name
    pub(crate) channel: String,

    /// Start date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(short, long)]
    pub(crate) start: String,

    /// End date, inclusive (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(short, long)]
    pub(crate) end: String,

    /// Days processed concurrently
    #[arg(short, long, default_value_t = 10)]
    pub(crate) workers: usize,

    /// Network requests in flight at once
    #[arg(long, default_value_t = 5)]
    pub(crate) max_concurrent: usize,

    /// Requests started per second
    #[arg(long, default_value_t = 5)]
    pub(crate) rate_limit: usize,

    /// Directory for day files
    #[arg(long, default_value = "logs")]
    pub(crate) logs_dir: PathBuf,

    /// Directory for the failure report
    #[arg(long, default_value = ".")]
    pub(crate) report_dir: PathBuf,

    /// Base URL of the log service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub(crate) base_url: String,

    /// Per-request timeout in seconds (no timeout if omitted)
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// Seconds in-flight requests may keep running after Ctrl+C
    #[arg(long, default_value_t = 2)]
    pub(crate) cancel_grace_secs: u64,

    /// Skip the channel existence check
    #[arg(long)]
    pub(crate) no_validate: bool,
}

impl DownloadArgs {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    fn batch_config(&self) -> BatchConfig {
        BatchConfig::default()
            .with_workers(self.workers)
            .with_max_concurrent_requests(self.max_concurrent)
            .with_rate_limit(self.rate_limit, Duration::from_secs(1))
            .with_logs_dir(&self.logs_dir)
            .with_report_dir(&self.report_dir)
            .with_channel_validation(!self.no_validate)
            .with_cancel_grace(Duration::from_secs(self.cancel_grace_secs))
    }
}

/// Download every day of the requested range.
///
/// Failed days do not make this return an error; they are listed in the
/// failure report whose path is printed at the end.
pub(crate) async fn download(args: DownloadArgs, quiet: bool) -> Result<()> {
    let channel = Channel::new(&args.channel).context("Invalid channel name")?;
    let start =
        parse_date(&args.start).with_context(|| format!("Invalid start date: {}", args.start))?;
    let end = parse_date(&args.end).with_context(|| format!("Invalid end date: {}", args.end))?;
    let range = DateRange::new(start, end)?;

    let client = LogClient::new(args.client_config()).context("Failed to build HTTP client")?;
    let config = args.batch_config();
    let report_path = config.layout().report_path(&channel);

    let shutdown = ShutdownSignal::new();
    shutdown.install_ctrl_c_handler();
    let coordinator = BatchCoordinator::new(client, config).with_shutdown(shutdown);

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(range.total_days() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{channel} {range}"));
        pb
    };

    let result = coordinator
        .run_with_progress(&channel, start, end, |day, outcome| {
            if outcome.is_failed() {
                progress.println(format!("{day}: {outcome}"));
            }
            progress.inc(1);
        })
        .await
        .with_context(|| format!("Download for {channel} could not start"))?;

    progress.finish_and_clear();

    if !quiet {
        println!("{result}");
        if result.has_failures() {
            println!("Failed days listed in: {}", report_path.display());
        }
    }

    Ok(())
}
