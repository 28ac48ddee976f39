//! Configuration types for the code runner
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration that talks to the public Piston instance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::executors::piston::DEFAULT_PISTON_ENDPOINT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionConfig::default(),
            storage: StorageConfig::default(),
            default_language: default_language(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Runtime version requested from the service; `*` picks the latest.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Location of the JSON store. Defaults to the user's local data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".local")
                    .join("share")
            })
            .join("coderun")
            .join("store.json")
    }
}

fn default_language() -> String {
    "c".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_PISTON_ENDPOINT.to_string()
}

fn default_version() -> String {
    "*".to_string()
}
