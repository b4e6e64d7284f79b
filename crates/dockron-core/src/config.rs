use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";
pub const DEFAULT_DOCKER_BINARY: &str = "docker";
pub const DEFAULT_EVENT_BUFFER: usize = 256; // lifecycle events buffered between reader and loop
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dockron/dockron.toml";

/// Top-level config (dockron.toml + DOCKRON_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DockronConfig {
    #[serde(default)]
    pub docker: DockerConfig,
}

/// Container-runtime connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Unix socket the engine must expose. Checked for existence at startup;
    /// a missing socket is a fatal error.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// CLI binary used to talk to the engine.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Capacity of the lifecycle-event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            binary: default_binary(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_socket_path() -> String {
    DEFAULT_SOCKET_PATH.to_string()
}
fn default_binary() -> String {
    DEFAULT_DOCKER_BINARY.to_string()
}
fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

impl DockronConfig {
    /// Load config from a TOML file with DOCKRON_* env var overrides
    /// (double underscore separates nesting: `DOCKRON_DOCKER__BINARY`).
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. /etc/dockron/dockron.toml
    ///
    /// A missing file is not an error — defaults apply.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);

        let config: DockronConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("DOCKRON_").split("__"))
            .extract()
            .map_err(|e| crate::error::DockronError::Config(e.to_string()))?;

        Ok(config)
    }
}
