use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::Command;

/// Builds the retention sweep job. `schedule` is a cron expression with a
/// seconds field.
pub async fn scheduler(command: &Command, schedule: &str) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;
    let command = command.clone();

    sched
        .add(Job::new_async(schedule, move |uuid, mut l| {
            let command = command.clone();

            Box::pin(async move {
                let report = command.sweep_expired(eventflow_shared::now()).await;

                if report.failures > 0 {
                    tracing::warn!(failures = report.failures, "retention sweep had failures");
                }

                if let Err(err) = l.next_tick_for_job(uuid).await {
                    tracing::error!(err = %err, "failed to get next tick for retention sweep");
                }
            })
        })?)
        .await?;

    Ok(sched)
}
