//! Docker CLI subprocess client.

use std::process::Stdio;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, warn};

use dockron_core::{
    ContainerRef, ContainerRuntime, DockerConfig, ExecOutput, LifecycleEvent, RuntimeError,
};

use crate::wire::{EventMessage, InspectEntry};

/// [`ContainerRuntime`] implementation that shells out to the `docker` CLI.
pub struct DockerCli {
    binary: String,
    event_buffer: usize,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>, event_buffer: usize) -> Self {
        Self {
            binary: binary.into(),
            event_buffer,
        }
    }

    pub fn from_config(config: &DockerConfig) -> Self {
        Self::new(&config.binary, config.event_buffer)
    }

    /// Run `docker <args>` to completion and capture its output.
    async fn run(&self, args: &[&str]) -> Result<std::process::Output, RuntimeError> {
        debug!(binary = %self.binary, ?args, "running docker command");
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }

    /// Run a command that must succeed; returns its stdout.
    async fn run_checked(&self, args: &[&str]) -> Result<String, RuntimeError> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeError::Transport(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn inspect(&self, ids: &[&str]) -> Result<Vec<ContainerRef>, RuntimeError> {
        let mut args = vec!["inspect", "--type", "container"];
        args.extend_from_slice(ids);
        let stdout = self.run_checked(&args).await?;
        let entries: Vec<InspectEntry> = serde_json::from_str(&stdout)?;
        Ok(entries.into_iter().map(InspectEntry::into_container).collect())
    }
}

/// Stderr patterns the CLI emits for a container that is gone (or no longer
/// runnable). Matched case-insensitively; wording varies across versions.
fn is_not_found_stderr(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("no such container")
        || lower.contains("no such object")
        || lower.contains("is not running")
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn ping(&self) -> Result<(), RuntimeError> {
        let output = self
            .run(&["version", "--format", "{{.Server.Version}}"])
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeError::Unavailable(stderr.trim().to_string()));
        }
        debug!(
            server = %String::from_utf8_lossy(&output.stdout).trim(),
            "docker daemon reachable"
        );
        Ok(())
    }

    async fn list_running(&self) -> Result<Vec<ContainerRef>, RuntimeError> {
        let stdout = self.run_checked(&["ps", "-q", "--no-trunc"]).await?;
        let ids: Vec<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.inspect(&ids).await
    }

    async fn container_by_short_id(&self, short_id: &str) -> Result<ContainerRef, RuntimeError> {
        let output = self
            .run(&["inspect", "--type", "container", short_id])
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found_stderr(&stderr) {
                return Err(RuntimeError::NotFound {
                    id: short_id.to_string(),
                });
            }
            return Err(RuntimeError::Transport(stderr.trim().to_string()));
        }

        let entries: Vec<InspectEntry> =
            serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;
        entries
            .into_iter()
            .next()
            .map(InspectEntry::into_container)
            .ok_or_else(|| RuntimeError::NotFound {
                id: short_id.to_string(),
            })
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, RuntimeError> {
        let mut child = Command::new(&self.binary)
            .args([
                "events",
                "--filter",
                "type=container",
                "--format",
                "{{json .}}",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            RuntimeError::Transport("docker events produced no stdout handle".to_string())
        })?;

        let (tx, rx) = mpsc::channel(self.event_buffer);
        tokio::spawn(async move {
            // Keep the child alive for as long as we read from it;
            // kill_on_drop reaps it when this task ends.
            let _child = child;
            let mut lines = FramedRead::new(stdout, LinesCodec::new());

            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("event stream read failed: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<EventMessage>(&line) {
                    Ok(message) => {
                        // Send blocks when the loop lags; order is preserved.
                        if tx.send(message.into_event()).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("undecodable event line, skipping: {e}"),
                }
            }
            debug!("docker events reader stopped");
        });

        Ok(rx)
    }

    async fn exec_in_container(
        &self,
        short_id: &str,
        shell_command: &str,
    ) -> Result<ExecOutput, RuntimeError> {
        let output = self
            .run(&["exec", short_id, "/bin/sh", "-c", shell_command])
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && is_not_found_stderr(&stderr) {
            return Err(RuntimeError::NotFound {
                id: short_id.to_string(),
            });
        }

        // A non-zero command exit is a result, not an error; the exit code
        // travels back to the executor as-is (including e.g. 137).
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&stderr);
        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_stderr_variants_are_recognised() {
        assert!(is_not_found_stderr("Error: No such container: abc123"));
        assert!(is_not_found_stderr(
            "Error response from daemon: no such object"
        ));
        assert!(is_not_found_stderr(
            "container abc123 is not running"
        ));
        assert!(!is_not_found_stderr("permission denied"));
    }
}
