//! Runtime configuration, read from a TOML file.
//!
//! ```toml
//! [api]
//! base_url = "https://cattle.example.org/api/"
//! connect_timeout_secs = 60
//! read_timeout_secs = 90
//! write_timeout_secs = 90
//!
//! [storage]
//! database_path = "./data/cattle_registry.db"
//!
//! [orchestrator]
//! trigger_policy = "ignore_while_loading"
//! ```

use crate::database::default_database_path;
use crate::error::AppError;
use crate::viewmodel::TriggerPolicy;
use cattle_api::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 60,
            read_timeout_secs: 90,
            write_timeout_secs: 90,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub trigger_policy: TriggerPolicy,
}

impl AppConfig {
    /// Reads the file at `path`; a missing file means all defaults
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        cattle_api::parse_base_url(&self.api.base_url)
            .map_err(|e| AppError::Config(e.to_string()))?;

        for (name, secs) in [
            ("connect_timeout_secs", self.api.connect_timeout_secs),
            ("read_timeout_secs", self.api.read_timeout_secs),
            ("write_timeout_secs", self.api.write_timeout_secs),
        ] {
            if secs == 0 {
                return Err(AppError::Config(format!("api.{} must be greater than 0", name)));
            }
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(AppError::Config("storage.database_path must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        let mut transport = TransportConfig::new(self.api.base_url.trim());
        transport.connect_timeout = Duration::from_secs(self.api.connect_timeout_secs);
        transport.read_timeout = Duration::from_secs(self.api.read_timeout_secs);
        transport.write_timeout = Duration::from_secs(self.api.write_timeout_secs);
        if let Some(user_agent) = &self.api.user_agent {
            transport.user_agent = user_agent.clone();
        }
        transport
    }
}
