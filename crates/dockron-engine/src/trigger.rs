//! Per-job trigger tasks — the cron firing mechanism.
//!
//! Each table entry owns one detached tokio task that sleeps until the next
//! cron fire and runs the job through its [`JobRunner`]. Fires are awaited
//! inline, so a job can never overlap itself: at most one execution per job
//! id is in flight at any time.

use std::sync::Arc;

use chrono::Local;
use cron::Schedule;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::executor::JobRunner;
use crate::types::JobRecord;

/// Opaque handle to a registered trigger.
///
/// Cancelling stops *future* fires only — an execution already dispatched
/// runs to completion and is contained by the runner.
#[derive(Debug)]
pub struct TriggerHandle {
    cancel: CancellationToken,
}

impl TriggerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Spawn the timer task for one job and return its handle.
///
/// Fire times come from `Schedule::upcoming` in local time, so the `TZ`
/// environment variable governs when jobs run.
pub fn spawn_trigger(
    schedule: Schedule,
    record: JobRecord,
    runner: Arc<dyn JobRunner>,
) -> TriggerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        loop {
            let Some(next) = schedule.upcoming(Local).next() else {
                debug!(job_id = %record.id, "schedule has no future fire times");
                break;
            };
            let Ok(wait) = (next - Local::now()).to_std() else {
                // Fire time slipped into the past while we computed it.
                continue;
            };

            tokio::select! {
                _ = token.cancelled() => {
                    debug!(job_id = %record.id, "trigger cancelled");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    runner.run(&record).await;
                }
            }
        }
    });

    TriggerHandle { cancel }
}
