//! The live job table — the only shared mutable state in the process.
//!
//! Entries are indexed by container short id first, then job id, giving O(1)
//! scoped removal when a container goes away. One mutex guards the whole
//! map; every operation is sync and never holds the lock across an await or
//! an external runtime call, so trigger fires are never blocked behind I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::EngineError;
use crate::executor::JobRunner;
use crate::schedule;
use crate::trigger::{self, TriggerHandle};
use crate::types::JobRecord;

/// A scheduled job plus the handle to its registered trigger.
struct JobTableEntry {
    record: JobRecord,
    trigger: TriggerHandle,
}

/// In-memory map of all scheduled jobs, safe for concurrent use.
pub struct JobTable {
    runner: Arc<dyn JobRunner>,
    /// container short id → (job id → entry)
    jobs: Mutex<HashMap<String, HashMap<String, JobTableEntry>>>,
}

impl JobTable {
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            runner,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Register `record` and spawn its trigger.
    ///
    /// Callers always remove a container's jobs before re-adding them, so a
    /// duplicate id here is a logic defect and comes back as
    /// [`EngineError::DuplicateJob`] rather than a silent overwrite. The
    /// schedule was validated upstream; a parse failure at this point is
    /// likewise surfaced loudly.
    pub fn add(&self, record: JobRecord) -> Result<(), EngineError> {
        // Parse outside the lock — never do work under it that isn't a map op.
        let parsed = schedule::parse_schedule(&record.schedule)?;

        let mut jobs = self.jobs.lock().unwrap();
        if jobs
            .get(&record.container_short_id)
            .is_some_and(|bucket| bucket.contains_key(&record.id))
        {
            return Err(EngineError::DuplicateJob {
                id: record.id.clone(),
            });
        }

        let trigger = trigger::spawn_trigger(parsed, record.clone(), Arc::clone(&self.runner));
        info!(
            job_id = %record.id,
            schedule = %record.schedule,
            command = %record.command,
            "scheduled job"
        );
        jobs.entry(record.container_short_id.clone())
            .or_default()
            .insert(record.id.clone(), JobTableEntry { record, trigger });
        Ok(())
    }

    /// Remove and unregister every job scoped to `short_id`.
    ///
    /// Idempotent: removing a container with no jobs is a no-op. Returns the
    /// number of entries removed.
    pub fn remove_container(&self, short_id: &str) -> usize {
        let bucket = self.jobs.lock().unwrap().remove(short_id);
        let Some(bucket) = bucket else {
            return 0;
        };

        let count = bucket.len();
        for (job_id, entry) in bucket {
            entry.trigger.cancel();
            info!(job_id = %job_id, "removed job");
        }
        count
    }

    /// Snapshot of all registered job ids, for diagnostics.
    pub fn job_ids(&self) -> Vec<String> {
        self.jobs
            .lock()
            .unwrap()
            .values()
            .flat_map(|bucket| bucket.keys().cloned())
            .collect()
    }

    /// Total number of scheduled jobs.
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancel every trigger without waiting for in-flight executions.
    /// Called once at process shutdown.
    pub fn shutdown(&self) {
        let buckets: Vec<_> = self.jobs.lock().unwrap().drain().collect();
        let mut count = 0;
        for (_, bucket) in buckets {
            for entry in bucket.values() {
                entry.trigger.cancel();
                count += 1;
            }
        }
        info!(jobs = count, "job table shut down");
    }

    /// Look up a record by job id. Diagnostic helper, mostly for tests.
    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        let jobs = self.jobs.lock().unwrap();
        jobs.values()
            .find_map(|bucket| bucket.get(job_id))
            .map(|entry| entry.record.clone())
    }
}
