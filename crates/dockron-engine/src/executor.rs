//! Job execution at trigger fire time.
//!
//! Failure containment here is a hard contract: nothing that happens while
//! running one job — non-zero exit, vanished container, runtime hiccup — may
//! propagate back into the trigger layer. A failing job stays scheduled and
//! its next cron fire is the only retry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use dockron_core::ContainerRuntime;

use crate::types::JobRecord;

/// Seam between trigger tasks and actual command execution.
///
/// Trigger tasks only know this trait; tests substitute a recording runner.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run the job once. Infallible by design — all outcomes are reported
    /// through logs, never to the caller.
    async fn run(&self, record: &JobRecord);
}

/// Production runner: executes the job's command inside its container.
pub struct Executor {
    runtime: Arc<dyn ContainerRuntime>,
}

impl Executor {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl JobRunner for Executor {
    async fn run(&self, record: &JobRecord) {
        info!(
            job_id = %record.id,
            container = %record.container_name,
            "running job"
        );

        match self
            .runtime
            .exec_in_container(&record.container_short_id, &record.command)
            .await
        {
            Ok(result) if result.exit_code != 0 => {
                error!(
                    job_id = %record.id,
                    container = %record.container_name,
                    exit_code = result.exit_code,
                    "job exited non-zero: {}",
                    result.output.trim()
                );
            }
            Ok(_) => {
                debug!(job_id = %record.id, "job completed");
            }
            Err(e) => {
                error!(
                    job_id = %record.id,
                    container = %record.container_name,
                    "job execution failed: {e}"
                );
            }
        }
    }
}
