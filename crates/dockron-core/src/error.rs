use thiserror::Error;

/// Errors surfaced by a [`crate::runtime::ContainerRuntime`] implementation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The container does not exist (or no longer exists). This is an
    /// expected, routine condition during event handling — callers match on
    /// it rather than treating it as a failure.
    #[error("container not found: {id}")]
    NotFound { id: String },

    /// The runtime rejected or failed the request.
    #[error("runtime error: {0}")]
    Transport(String),

    /// The runtime returned a payload we could not decode.
    #[error("undecodable runtime payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Spawning or talking to the runtime process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The runtime is not reachable at all (daemon down, socket missing).
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),
}

impl RuntimeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum DockronError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DockronError>;
