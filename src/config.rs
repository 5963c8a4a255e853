use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Server configuration, loadable from a YAML file with every field
/// optional; the CLI overrides the port and file root on top.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind; all interfaces unless narrowed.
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory served as the file root; also holds log.txt.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("root"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total idle budget in seconds, shared across active connections.
    pub idle_budget_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            idle_budget_secs: 20,
        }
    }
}

impl TimeoutConfig {
    pub fn idle_budget(&self) -> Duration {
        Duration::from_secs(self.idle_budget_secs)
    }
}

impl Config {
    /// Loads configuration from the given YAML file, or defaults when no
    /// file was supplied.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                Ok(serde_yaml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }
}
