use chrono::{Duration as ChronoDuration, Utc};
use pyrolink_error::storage::StorageError;
use pyrolink_models::{settings::Sweeper, CommandStore};
use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Terminal error text recorded when the retry ceiling is spent.
const DEADLINE_ERROR: &str = "no acknowledgment before the processing deadline";

/// Outcome of one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub requeued: usize,
    pub timed_out: usize,
}

/// Periodic reconciliation of commands stuck in processing.
///
/// A relay can die between claiming a command and acknowledging it. The
/// sweeper returns such commands to the queue while retries remain, then
/// settles them as timed-out. Every transition is guarded on the processing
/// status so a late acknowledgment beats the sweeper, never the reverse.
pub struct CommandSweeper {
    commands: Arc<dyn CommandStore>,
    interval: Duration,
    processing_timeout_secs: i64,
}

impl CommandSweeper {
    pub fn new(commands: Arc<dyn CommandStore>, settings: &Sweeper) -> Self {
        Self {
            commands,
            interval: Duration::from_secs(settings.interval_secs),
            processing_timeout_secs: settings.processing_timeout_secs,
        }
    }

    /// Runs sweep passes until `shutdown` fires. Meant to be spawned.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.interval);
        info!(
            interval_secs = self.interval.as_secs(),
            timeout_secs = self.processing_timeout_secs,
            "command sweeper started"
        );
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(report) if report.requeued + report.timed_out > 0 => {
                            info!(
                                requeued = report.requeued,
                                timed_out = report.timed_out,
                                "stale dispatches reconciled"
                            );
                        }
                        Ok(_) => {}
                        Err(err) => error!(error = %err, "sweep pass failed"),
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("command sweeper stopped");
                    break;
                }
            }
        }
    }

    /// One reconciliation pass over everything past the processing deadline.
    pub async fn sweep_once(&self) -> Result<SweepReport, StorageError> {
        let cutoff = Utc::now() - ChronoDuration::seconds(self.processing_timeout_secs);
        let stale = self.commands.find_stale_processing(cutoff).await?;

        let mut report = SweepReport::default();
        for command in &stale {
            if command.retries_remaining() {
                if self.commands.requeue(command).await? {
                    report.requeued += 1;
                    warn!(
                        command = command.id,
                        token = %command.token,
                        retry = command.retry_count + 1,
                        of = command.max_retries,
                        "stale dispatch requeued"
                    );
                }
            } else if self.commands.time_out(command, DEADLINE_ERROR).await? {
                report.timed_out += 1;
                warn!(
                    command = command.id,
                    token = %command.token,
                    "command timed out, retries exhausted"
                );
            }
            // A false return above means an acknowledgment landed mid-pass
            // and settled the command; nothing to count.
        }
        Ok(report)
    }
}
