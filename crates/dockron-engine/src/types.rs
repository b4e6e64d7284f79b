use std::collections::HashMap;

use serde::Serialize;

/// Partial job definition collected from `scheduler.<job>.<prop>` labels.
/// Transient — produced and consumed within one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJob {
    pub schedule: Option<String>,
    pub command: Option<String>,
}

/// Raw property groups keyed by job name. Iteration order is unspecified.
pub type RawJobGroups = HashMap<String, RawJob>;

/// A validated, schedulable job. Immutable once created — a changed label
/// set produces a brand-new record that replaces the old one wholesale.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JobRecord {
    /// `<container_short_id>_<job_name>` — unique within the job table.
    pub id: String,
    pub container_short_id: String,
    pub container_name: String,
    /// Crontab expression, validated before the record is built.
    pub schedule: String,
    /// Shell command string, run through `/bin/sh -c` at fire time.
    pub command: String,
}

impl JobRecord {
    pub fn new(
        container_short_id: &str,
        container_name: &str,
        job_name: &str,
        schedule: &str,
        command: &str,
    ) -> Self {
        Self {
            id: format!("{container_short_id}_{job_name}"),
            container_short_id: container_short_id.to_string(),
            container_name: container_name.to_string(),
            schedule: schedule.to_string(),
            command: command.to_string(),
        }
    }
}
