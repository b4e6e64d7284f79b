//! Serde views of the Docker CLI's JSON output — only the fields we consume.

use std::collections::HashMap;

use serde::Deserialize;

use dockron_core::{ContainerRef, EventAction, LifecycleEvent};

/// One element of a `docker inspect` array.
#[derive(Debug, Deserialize)]
pub struct InspectEntry {
    #[serde(rename = "Id")]
    pub id: String,
    /// Docker reports names with a leading slash (`/web`).
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Config")]
    pub config: InspectConfig,
}

#[derive(Debug, Deserialize)]
pub struct InspectConfig {
    /// Null when the container has no labels at all.
    #[serde(rename = "Labels")]
    pub labels: Option<HashMap<String, String>>,
}

impl InspectEntry {
    pub fn into_container(self) -> ContainerRef {
        let name = self.name.trim_start_matches('/').to_string();
        ContainerRef::new(self.id, name, self.config.labels.unwrap_or_default())
    }
}

/// One line of `docker events --format '{{json .}}'`.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "Action")]
    pub action: String,
    /// Full container id.
    #[serde(default)]
    pub id: String,
}

impl EventMessage {
    pub fn into_event(self) -> LifecycleEvent {
        LifecycleEvent {
            action: EventAction::parse(&self.action),
            container_id: self.id,
        }
    }
}
