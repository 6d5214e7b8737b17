//! chatlog CLI - Rate-limited chat log archive downloader.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::download::DownloadArgs;
use display::Format;

#[derive(Parser)]
#[command(name = "chatlog")]
#[command(about = "Download and convert chat log archives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the log service has logs for a channel
    Check {
        /// Channel name
        channel: String,

        /// Base URL of the log service
        #[arg(long, default_value = chatlog_lib::url::DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Download one file per day for a channel
    Download(DownloadArgs),

    /// Combine downloaded day files into one table
    Convert {
        /// Directory searched recursively for *.txt files
        #[arg(short, long, default_value = "logs")]
        logs_dir: PathBuf,

        /// Output file path. Defaults to processed_logs/combined_chat_logs.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },
}

/// Default filter for our own crates; `RUST_LOG` replaces it entirely.
fn default_filter(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    format!("warn,chatlog={level},chatlog_fetch={level},chatlog_format={level}")
}

fn init_tracing(verbose: u8, quiet: bool) {
    let json_format = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Check { channel, base_url } => commands::check::check(&channel, base_url).await,
        Commands::Download(args) => commands::download::download(args, cli.quiet).await,
        Commands::Convert {
            logs_dir,
            output,
            format,
        } => commands::convert::convert(&logs_dir, output, format, cli.quiet),
    }
}
