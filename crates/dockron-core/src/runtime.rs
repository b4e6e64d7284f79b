use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::RuntimeError;
use crate::types::{ContainerRef, ExecOutput, LifecycleEvent};

/// Capability interface over the container engine.
///
/// The scheduler core never talks to a socket or spawns `docker` itself; it
/// only sees this trait. The production implementation lives in
/// `dockron-docker`; tests substitute an in-memory fake.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Cheap liveness probe. Used once at startup — the process refuses to
    /// start when the runtime is unreachable.
    async fn ping(&self) -> Result<(), RuntimeError>;

    /// Snapshot of all currently running containers, labels included.
    async fn list_running(&self) -> Result<Vec<ContainerRef>, RuntimeError>;

    /// Resolve a single container by its short id.
    ///
    /// Returns [`RuntimeError::NotFound`] when the container is gone — an
    /// expected condition while processing lifecycle events.
    async fn container_by_short_id(&self, short_id: &str) -> Result<ContainerRef, RuntimeError>;

    /// Ordered, blocking stream of container lifecycle events.
    ///
    /// The channel preserves the runtime's delivery order; the receiver is
    /// the event loop's single consumer.
    async fn subscribe_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, RuntimeError>;

    /// Run `shell_command` inside the container through `/bin/sh -c`, so
    /// redirection and piping in the command string work.
    ///
    /// A non-zero command exit is *not* an error — it is reported through
    /// [`ExecOutput::exit_code`]. Errors are reserved for transport-level
    /// failures and vanished containers.
    async fn exec_in_container(
        &self,
        short_id: &str,
        shell_command: &str,
    ) -> Result<ExecOutput, RuntimeError>;
}
