//! `dockron-engine` — the reconciliation and execution engine.
//!
//! # Overview
//!
//! The engine keeps one invariant alive for the whole process lifetime: the
//! [`table::JobTable`] contains exactly the jobs declared by currently
//! running, schedule-enabled containers. Everything else is in service of
//! restoring that invariant when something moves.
//!
//! Data flow:
//!
//! ```text
//! labels ─► labels::extract_raw_jobs ─► validate::validate_jobs ─► JobRecord
//!                                                                     │
//! lifecycle events ─► events::run_event_loop ─► reconcile::Reconciler ─► JobTable
//!                                                                     │
//!                                        trigger fire ─► executor::Executor
//! ```
//!
//! Reconciliation is remove-then-rebuild: a container's whole job set is
//! dropped and re-added from its current labels on every sync. That trades a
//! few redundant trigger registrations for never retaining a stale record.

pub mod error;
pub mod events;
pub mod executor;
pub mod labels;
pub mod reconcile;
pub mod schedule;
pub mod table;
pub mod trigger;
pub mod types;
pub mod validate;

pub use error::{EngineError, Result};
pub use events::run_event_loop;
pub use executor::{Executor, JobRunner};
pub use reconcile::{initial_sync, Reconciler};
pub use table::JobTable;
pub use types::{JobRecord, RawJob, RawJobGroups};
