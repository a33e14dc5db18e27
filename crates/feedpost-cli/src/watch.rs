//! `watch` subcommand: the pipeline on a cron schedule.

use std::sync::Arc;

use feedpost_core::AppConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::runner;

/// Registers the publish job and blocks until Ctrl-C.
///
/// A tick that fires while the previous run is still going is skipped, so two
/// runs never race through the duplicate check.
///
/// # Errors
///
/// Returns an error if `schedule` is not a valid cron expression or the
/// scheduler cannot start.
pub(crate) async fn watch(
    config: Arc<AppConfig>,
    schedule: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut scheduler = JobScheduler::new().await?;
    let in_flight = Arc::new(Mutex::new(()));

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let in_flight = Arc::clone(&in_flight);

        Box::pin(async move {
            let Ok(_guard) = in_flight.try_lock_owned() else {
                tracing::warn!("scheduler: previous run still in progress; skipping tick");
                return;
            };
            tracing::info!(dry_run, "scheduler: starting publish run");
            match runner::run_once(&config, dry_run).await {
                Ok(report) => tracing::info!(
                    exit_code = report.outcome.exit_code(),
                    outcome = %runner::format_outcome(&report.outcome),
                    "scheduler: publish run complete"
                ),
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "scheduler: run could not start");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(schedule, dry_run, "watching feed; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
