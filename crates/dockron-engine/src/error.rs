use thiserror::Error;

use dockron_core::RuntimeError;

/// Errors that can occur within the scheduling engine.
///
/// `InvalidSchedule` and `DuplicateJob` after validation are logic defects:
/// the caller contract (remove-then-rebuild, validate-before-add) makes them
/// unreachable in normal operation, so they abort the current reconciliation
/// loudly instead of being papered over.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The cron expression does not parse.
    #[error("invalid cron expression `{expr}`: {reason}")]
    InvalidSchedule { expr: String, reason: String },

    /// An entry with this id is already registered.
    #[error("duplicate job id: {id}")]
    DuplicateJob { id: String },

    /// Underlying container-runtime failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
