//! Entry point for the scheduled contact purge.
//!
//! A run resolves the `CutoffDays` parameter, exchanges the service account credentials for a
//! bearer token and registers a purge task with that token. Each step aborts the run on failure.
//! [`PurgeContactsJob::execute`] is the boundary the scheduler calls: every failure, including a
//! panic, ends up in the log and never reaches the caller.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{error, info_span, warn, Instrument};

use crate::config::JobConfiguration;
use crate::context::{CommandItem, CutoffDays, ScheduleItem};
use crate::error::{FailureKind, PurgeError};
use crate::http::HttpSender;
use crate::metrics;
use crate::task::{register_purge_task, PurgeReceipt};
use crate::token::acquire_token;

/// How a single scheduled invocation ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(PurgeReceipt),
    /// The run stopped early; the reason has been logged.
    Failed(FailureKind),
    /// A previous run was still in flight.
    Skipped,
}

impl RunOutcome {
    fn label(&self) -> &'static str {
        match self {
            RunOutcome::Completed(_) => "completed",
            RunOutcome::Failed(kind) => kind.as_str(),
            RunOutcome::Skipped => "skipped",
        }
    }
}

pub struct PurgeContactsJob<H> {
    config: JobConfiguration,
    http: H,
    running: Semaphore,
}

impl<H: HttpSender> PurgeContactsJob<H> {
    pub fn new(config: JobConfiguration, http: H) -> Self {
        Self {
            config,
            http,
            running: Semaphore::new(1),
        }
    }

    pub fn config(&self) -> &JobConfiguration {
        &self.config
    }

    /// Resolves the cutoff, obtains a token and registers the purge task.
    pub async fn run(&self, command: &CommandItem) -> Result<PurgeReceipt, PurgeError> {
        let cutoff_days =
            CutoffDays::resolve(&command.parameters, self.config.default_cutoff_days())?;

        let token = acquire_token(&self.http, &self.config).await?;

        register_purge_task(&self.http, self.config.task_url(), token, cutoff_days).await
    }

    /// Runs the job on behalf of a scheduler. Never fails and never unwinds.
    pub async fn execute(&self, command: &CommandItem, schedule: &ScheduleItem) -> RunOutcome {
        let span = info_span!(
            "purge_contacts",
            command = %command.name,
            schedule = %schedule.name
        );

        async {
            let started = Instant::now();

            let outcome = match self.running.try_acquire() {
                Ok(_permit) => self.guarded_run(command).await,
                Err(_) => {
                    warn!("previous contact purge run is still in progress, skipping this one");
                    RunOutcome::Skipped
                }
            };

            metrics::record_run(outcome.label(), started.elapsed());
            outcome
        }
        .instrument(span)
        .await
    }

    async fn guarded_run(&self, command: &CommandItem) -> RunOutcome {
        match AssertUnwindSafe(self.run(command)).catch_unwind().await {
            Ok(Ok(receipt)) => RunOutcome::Completed(receipt),
            Ok(Err(err)) => {
                if !err.is_reported() {
                    error!(error = %err, "Unhandled error detected in PurgeContactsCommand.");
                }
                RunOutcome::Failed(err.kind())
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|message| message.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "<non-string panic payload>".to_owned());
                error!(panic = %message, "Unhandled panic detected in PurgeContactsCommand.");
                RunOutcome::Failed(FailureKind::Panic)
            }
        }
    }
}
