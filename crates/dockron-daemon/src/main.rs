//! Dockron daemon — composition root.
//!
//! Bootstraps logging and config, verifies the container runtime is
//! reachable (refusing to start otherwise), performs the initial full-fleet
//! sync, then runs the event loop until SIGINT/SIGTERM.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use dockron_core::{ContainerRuntime, DockronConfig};
use dockron_docker::DockerCli;
use dockron_engine::{initial_sync, run_event_loop, Executor, JobTable, Reconciler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dockron=info".into()),
        )
        .init();

    // Cron fire times are computed in local time, so TZ decides when jobs run.
    let tz = std::env::var("TZ").unwrap_or_else(|_| "system default".to_string());
    info!(timezone = %tz, "configured timezone for job scheduling");

    // load config: explicit DOCKRON_CONFIG path > /etc/dockron/dockron.toml
    let config_path = std::env::var("DOCKRON_CONFIG").ok();
    let config = DockronConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("config load failed ({e}), using defaults");
        DockronConfig::default()
    });

    // No socket, no fleet view — refuse to start rather than idle blind.
    if !Path::new(&config.docker.socket_path).exists() {
        anyhow::bail!("docker socket not found at {}", config.docker.socket_path);
    }

    let runtime: Arc<dyn ContainerRuntime> = Arc::new(DockerCli::from_config(&config.docker));
    runtime
        .ping()
        .await
        .context("cannot connect to the docker daemon")?;
    info!("connected to docker daemon");

    let executor = Arc::new(Executor::new(Arc::clone(&runtime)));
    let table = Arc::new(JobTable::new(executor));
    let reconciler = Reconciler::new(Arc::clone(&table));

    initial_sync(runtime.as_ref(), &reconciler)
        .await
        .context("initial fleet sync failed")?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let event_runtime = Arc::clone(&runtime);
    let event_loop = tokio::spawn(async move {
        run_event_loop(event_runtime, reconciler, shutdown_rx).await
    });

    info!(jobs = table.len(), "dockron is running");
    wait_for_shutdown_signal().await?;
    info!("shutdown signal received");

    // Stop accepting events and cancel future fires; in-flight executions
    // are not awaited (non-blocking shutdown).
    let _ = shutdown_tx.send(true);
    table.shutdown();
    let _ = event_loop.await;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn wait_for_shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}
