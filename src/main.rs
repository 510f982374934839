mod browser;
mod client;
mod config;
mod error;
mod feed;
mod models;
mod render;
mod tui;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client::JobsClient;
use config::Config;
use feed::{FeedState, FeedView};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LIST_WIDTH: usize = 72;

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Job Radar - watch active job listings from the radar service")]
struct Cli {
    /// Base URL of the job listing service
    #[arg(
        long,
        global = true,
        env = "JOB_RADAR_ENDPOINT",
        default_value = config::DEFAULT_ENDPOINT_BASE_URL
    )]
    endpoint: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse listings interactively (default)
    Browse,

    /// Print listings to stdout
    List,
}

fn init_logging(command: &Commands) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("radar=info"));

    match command {
        // The terminal belongs to the UI, so diagnostics go to a file
        Commands::Browse => {
            let path = Config::log_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Commands::List => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    init_logging(&command)?;

    let config = Config::new(&cli.endpoint)?;
    tracing::info!(endpoint = %config.endpoint_base_url, "starting job radar");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let client = JobsClient::new(&config);
    tracing::debug!(url = client.jobs_url(), "job feed endpoint");
    let view = FeedView::new(client);

    match command {
        Commands::Browse => tui::run_browse(view)?,

        Commands::List => {
            let mut view = view;
            view.mount();
            let state = runtime.block_on(view.settled());
            print!("{}", render::to_text(&render::screen(state, LIST_WIDTH)));

            if *state == FeedState::Failed {
                return Err(anyhow!(
                    "Could not load job listings from {}",
                    config.jobs_url()
                ));
            }
        }
    }

    Ok(())
}
