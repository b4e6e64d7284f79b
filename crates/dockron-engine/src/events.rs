//! The event loop — single consumer of the runtime's lifecycle stream.
//!
//! Events are processed strictly one at a time, in delivery order. That
//! ordering is the correctness mechanism: applying a `start` after a later
//! `die` for the same container would leave jobs registered for a corpse, so
//! no concurrency or reordering is allowed inside the loop.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use dockron_core::{short_id, ContainerRuntime, LifecycleEvent, RuntimeError};

use crate::error::EngineError;
use crate::reconcile::Reconciler;

/// Consume lifecycle events and drive table mutations until shutdown.
///
/// Runs until the shutdown watch flips to `true` or the event channel
/// closes. Per-event failures never terminate the loop.
pub async fn run_event_loop(
    runtime: Arc<dyn ContainerRuntime>,
    reconciler: Reconciler,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), EngineError> {
    let mut events = runtime.subscribe_events().await?;
    info!("event loop started");

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    warn!("event stream closed");
                    break;
                };
                handle_event(runtime.as_ref(), &reconciler, event).await;
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("event loop shutting down");
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn handle_event(
    runtime: &dyn ContainerRuntime,
    reconciler: &Reconciler,
    event: LifecycleEvent,
) {
    let cid = short_id(&event.container_id);

    if event.action.triggers_sync() {
        match runtime.container_by_short_id(&cid).await {
            Ok(container) => {
                info!(
                    container = %container.name,
                    id = %cid,
                    action = %event.action,
                    "syncing jobs"
                );
                if let Err(e) = reconciler.reconcile(&container) {
                    error!(container = %container.name, id = %cid, "reconciliation failed: {e}");
                }
            }
            // The container vanished between event arrival and lookup. A
            // later stop/die/destroy (or silence) is the authoritative
            // removal signal, so this is a logged no-op.
            Err(RuntimeError::NotFound { .. }) => {
                debug!(id = %cid, action = %event.action, "container gone before sync — skipping");
            }
            Err(e) => {
                warn!(id = %cid, action = %event.action, "container lookup failed: {e}");
            }
        }
    } else if event.action.triggers_removal() {
        let removed = reconciler.remove_container(&cid);
        if removed > 0 {
            info!(id = %cid, action = %event.action, removed, "removed jobs for container");
        } else {
            debug!(id = %cid, action = %event.action, "no jobs to remove");
        }
    } else {
        debug!(id = %cid, action = %event.action, "ignoring event");
    }
}
