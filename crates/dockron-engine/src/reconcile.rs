//! Reconciliation — restore the job-table invariant for one container.
//!
//! The policy is remove-then-rebuild, in this exact order:
//!
//! 1. drop everything scoped to the container, unconditionally;
//! 2. stop if `scheduler.enable` is not `"true"` — the container now has
//!    zero jobs;
//! 3. otherwise extract, validate, and re-add from current labels.
//!
//! Step 1 running unconditionally is what guarantees no stale job survives a
//! disable, a schedule edit, or a command edit, whatever the new state is.

use std::sync::Arc;

use tracing::{debug, error, info};

use dockron_core::{ContainerRef, ContainerRuntime};

use crate::error::EngineError;
use crate::table::JobTable;
use crate::{labels, validate};

pub struct Reconciler {
    table: Arc<JobTable>,
}

impl Reconciler {
    pub fn new(table: Arc<JobTable>) -> Self {
        Self { table }
    }

    /// Recompute the container's correct job set and apply it to the table.
    ///
    /// An `add` failure is a structural defect (see [`JobTable::add`]); it
    /// aborts the remaining adds for this container and bubbles up, leaving
    /// the process alive.
    pub fn reconcile(&self, container: &ContainerRef) -> Result<(), EngineError> {
        let removed = self.table.remove_container(&container.short_id);

        if !labels::schedule_enabled(&container.labels) {
            debug!(
                container = %container.name,
                id = %container.short_id,
                removed,
                "scheduling disabled — container has no jobs"
            );
            return Ok(());
        }

        let raw = labels::extract_raw_jobs(&container.labels);
        let jobs = validate::validate_jobs(&container.short_id, &container.name, &raw);

        info!(
            container = %container.name,
            id = %container.short_id,
            jobs = jobs.len(),
            "resyncing jobs"
        );
        for job in jobs {
            self.table.add(job)?;
        }
        Ok(())
    }

    /// Drop every job scoped to `short_id` without looking the container up.
    /// Used for teardown events, where the container is usually already gone.
    pub fn remove_container(&self, short_id: &str) -> usize {
        self.table.remove_container(short_id)
    }
}

/// Scan all running containers at startup and sync their jobs.
///
/// A failure for one container is logged and does not abort the sweep; a
/// failure to list the fleet at all does — without a fleet view the process
/// must not start.
pub async fn initial_sync(
    runtime: &dyn ContainerRuntime,
    reconciler: &Reconciler,
) -> Result<(), EngineError> {
    info!("performing initial sync");
    let containers = runtime.list_running().await?;

    for container in &containers {
        if let Err(e) = reconciler.reconcile(container) {
            error!(
                container = %container.name,
                id = %container.short_id,
                "initial sync failed for container: {e}"
            );
        }
    }

    info!(containers = containers.len(), "initial sync complete");
    Ok(())
}
