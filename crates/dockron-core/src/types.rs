use std::collections::HashMap;

/// First segment of every label key the scheduler understands.
pub const LABEL_NAMESPACE: &str = "scheduler";

/// Label that gates scheduling for a whole container.
/// Only the exact value `"true"` (case-insensitive) enables it.
pub const ENABLE_LABEL: &str = "scheduler.enable";

/// Containers are scoped by the first 12 characters of their full id —
/// the same identifier the engine prints in `ps` output.
pub const SHORT_ID_LEN: usize = 12;

/// Truncate a full container id to its short form.
///
/// Ids shorter than [`SHORT_ID_LEN`] are returned unchanged.
pub fn short_id(full_id: &str) -> String {
    full_id.chars().take(SHORT_ID_LEN).collect()
}

/// A read-only view of one container, as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    /// Full container id.
    pub id: String,
    /// First 12 characters of `id` — the table-facing scoping key.
    pub short_id: String,
    /// Human-readable container name, without any leading `/`.
    pub name: String,
    /// Flat label map. Unordered; values are arbitrary strings.
    pub labels: HashMap<String, String>,
}

impl ContainerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, labels: HashMap<String, String>) -> Self {
        let id = id.into();
        let short = short_id(&id);
        Self {
            id,
            short_id: short,
            name: name.into(),
            labels,
        }
    }
}

/// Container lifecycle action, parsed from the runtime's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    Start,
    Update,
    Unpause,
    Rename,
    Stop,
    Die,
    Destroy,
    Pause,
    /// Anything the scheduler does not react to (exec_create, health_status, …).
    Other(String),
}

impl EventAction {
    /// Map a raw action string from the event stream. Unknown actions become
    /// [`EventAction::Other`] rather than an error — the loop ignores them.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "start" => EventAction::Start,
            "update" => EventAction::Update,
            "unpause" => EventAction::Unpause,
            "rename" => EventAction::Rename,
            "stop" => EventAction::Stop,
            "die" => EventAction::Die,
            "destroy" => EventAction::Destroy,
            "pause" => EventAction::Pause,
            other => EventAction::Other(other.to_string()),
        }
    }

    /// Actions that (re)compute a container's job set from its labels.
    pub fn triggers_sync(&self) -> bool {
        matches!(self, EventAction::Start | EventAction::Update | EventAction::Unpause)
    }

    /// Actions that drop every job scoped to the container, no lookup needed.
    pub fn triggers_removal(&self) -> bool {
        matches!(
            self,
            EventAction::Stop | EventAction::Die | EventAction::Destroy | EventAction::Pause
        )
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventAction::Start => "start",
            EventAction::Update => "update",
            EventAction::Unpause => "unpause",
            EventAction::Rename => "rename",
            EventAction::Stop => "stop",
            EventAction::Die => "die",
            EventAction::Destroy => "destroy",
            EventAction::Pause => "pause",
            EventAction::Other(s) => s,
        };
        write!(f, "{s}")
    }
}

/// One container lifecycle event. Processed in delivery order, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub action: EventAction,
    /// Full container id as delivered by the runtime.
    pub container_id: String,
}

/// Result of executing a command inside a container.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code of the command; `-1` when the process was killed by a signal
    /// before reporting one.
    pub exit_code: i32,
    /// Combined stdout + stderr.
    pub output: String,
}
