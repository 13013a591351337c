use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_PORT: u16 = 7180;

/// Runtime configuration, loaded from `<data dir>/config.toml` when present.
/// Missing fields fall back to defaults; CLI flags override on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    /// Base URL of the agent backend that receives escalations.
    pub agent_base_url: String,
    /// Detail-view polling interval, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: DEFAULT_API_PORT,
            agent_base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval_secs: 3,
        }
    }
}

impl Config {
    pub fn load(data_dir: &std::path::Path) -> Result<Self> {
        let path = data_dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Data directory: `CALLBOARD_DATA_DIR` when set, otherwise `~/.callboard`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CALLBOARD_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .expect("Could not find home directory")
        .join(".callboard")
}
