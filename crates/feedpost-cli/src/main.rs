mod runner;
mod watch;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use feedpost_core::AppConfig;
use feedpost_pipeline::AbortReason;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedpost")]
#[command(about = "Posts the newest news item to Bluesky with a generated caption")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once and exit with its outcome code.
    Run {
        /// Read the feed and the account, generate a caption, but do not publish.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the latest feed item, the latest post and the duplicate decision.
    Status,
    /// Run the pipeline on a cron schedule until interrupted.
    Watch {
        /// Six-field cron expression; defaults to `FEEDPOST_SCHEDULE`.
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match feedpost_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            let reason = AbortReason::PreconditionMissing(e.to_string());
            tracing::error!(error = %e, "configuration is incomplete; nothing was run");
            return ExitCode::from(reason.exit_code());
        }
    };
    init_tracing(&config.log_level);

    match dispatch(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "feedpost failed");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Option<Commands>, config: AppConfig) -> anyhow::Result<ExitCode> {
    match command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => {
            let report = runner::run_once(&config, dry_run).await?;
            println!("{}", runner::format_outcome(&report.outcome));
            Ok(ExitCode::from(report.outcome.exit_code()))
        }
        Commands::Status => {
            let status = runner::status(&config).await?;
            print!("{}", runner::format_status(&status));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch { schedule, dry_run } => {
            let schedule = schedule.unwrap_or_else(|| config.schedule.clone());
            watch::watch(Arc::new(config), &schedule, dry_run).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
