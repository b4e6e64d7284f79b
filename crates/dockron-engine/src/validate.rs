//! Job validation — raw property groups in, well-formed [`JobRecord`]s out.
//!
//! Rejection is always log-and-skip, never an error: one operator's typo on
//! one container must not affect any other job on the fleet.

use tracing::warn;

use crate::schedule;
use crate::types::{JobRecord, RawJobGroups};

/// Build the final job list for one container.
///
/// A group is dropped (with a warning) when its schedule or command is
/// missing or empty, or when the schedule is not a valid cron expression.
/// Output order follows map iteration and is unspecified — callers must
/// treat the result as a set.
pub fn validate_jobs(
    container_short_id: &str,
    container_name: &str,
    raw_jobs: &RawJobGroups,
) -> Vec<JobRecord> {
    let mut jobs = Vec::new();

    for (job_name, props) in raw_jobs {
        let schedule_expr = props.schedule.as_deref().unwrap_or("");
        let command = props.command.as_deref().unwrap_or("");

        if schedule_expr.is_empty() || command.is_empty() {
            warn!(
                container = %container_name,
                job = %job_name,
                "incomplete job definition — missing schedule or command"
            );
            continue;
        }

        if let Err(e) = schedule::parse_schedule(schedule_expr) {
            warn!(
                container = %container_name,
                job = %job_name,
                schedule = %schedule_expr,
                "invalid schedule, skipping job: {e}"
            );
            continue;
        }

        jobs.push(JobRecord::new(
            container_short_id,
            container_name,
            job_name,
            schedule_expr,
            command,
        ));
    }

    jobs
}
