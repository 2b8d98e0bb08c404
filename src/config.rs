use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{tlog_debug, Error, Result};

/// Default base path of the task backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the task backend, e.g. `http://localhost:8080/api`.
    pub base_url: Option<String>,
}

impl Config {
    /// App directory, normally `~/.taskdeck`. `TASKDECK_DIR` overrides it
    /// so tests can point at a temp directory.
    pub fn taskdeck_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("TASKDECK_DIR") {
            return Ok(PathBuf::from(dir));
        }
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".taskdeck"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::taskdeck_dir()?.join("taskdeck.toml"))
    }

    /// The one durable piece of client state: the bearer token.
    pub fn token_path() -> Result<PathBuf> {
        Ok(Self::taskdeck_dir()?.join("token"))
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        tlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            tlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        tlog_debug!("Config loaded: base_url={:?}", config.base_url);
        Ok(config)
    }
}
