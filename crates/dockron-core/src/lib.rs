//! `dockron-core` — shared types and capability interfaces for Dockron.
//!
//! Dockron discovers recurring jobs declared as labels on running containers
//! and keeps a cron-driven schedule in sync with the live fleet. This crate
//! holds what every other crate needs: the container/event data model, the
//! [`ContainerRuntime`] capability trait that abstracts the container engine,
//! and process configuration.
//!
//! Label format consumed by the scheduler:
//!
//! ```text
//! scheduler.enable            = "true"
//! scheduler.<job>.schedule    = "0 2 * * *"
//! scheduler.<job>.command     = "tar czf /backup.tgz /data"
//! ```

pub mod config;
pub mod error;
pub mod runtime;
pub mod types;

pub use config::{DockerConfig, DockronConfig};
pub use error::{DockronError, Result, RuntimeError};
pub use runtime::ContainerRuntime;
pub use types::{short_id, ContainerRef, EventAction, ExecOutput, LifecycleEvent};
