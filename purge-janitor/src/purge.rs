use std::sync::Arc;

use purge_common::context::{CommandItem, ScheduleItem};
use purge_common::job::{PurgeContactsJob, RunOutcome};

/// Fires the purge job for one schedule tick.
pub struct Purger {
    job: Arc<PurgeContactsJob<reqwest::Client>>,
    command: Arc<CommandItem>,
    schedule: Arc<ScheduleItem>,
}

impl Purger {
    pub fn new(
        job: PurgeContactsJob<reqwest::Client>,
        command: CommandItem,
        schedule: ScheduleItem,
    ) -> Self {
        Purger {
            job: Arc::new(job),
            command: Arc::new(command),
            schedule: Arc::new(schedule),
        }
    }

    /// Starts a run in its own task so the schedule keeps ticking while it is in flight.
    pub fn purge(&self) {
        let job = self.job.clone();
        let command = self.command.clone();
        let schedule = self.schedule.clone();

        tokio::spawn(async move {
            match job.execute(&command, &schedule).await {
                RunOutcome::Completed(receipt) => {
                    tracing::debug!(task_id = %receipt.task_id, "purge run finished");
                }
                outcome => tracing::debug!(?outcome, "purge run finished without a task"),
            }
        });
    }
}
