//! Configuration loader for YAML files and environment overrides

use std::env;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::types::RunnerConfig;
use crate::config::validation::validate_config;
use crate::errors::RunnerError;

pub const DEFAULT_CONFIG_FILE: &str = "coderun.yaml";

pub const ENDPOINT_ENV: &str = "CODERUN_ENDPOINT";
pub const STORE_ENV: &str = "CODERUN_STORE";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path` when given (it must exist), otherwise `coderun.yaml` in
    /// the working directory when present, otherwise the defaults. Environment
    /// overrides are applied last.
    pub async fn load(path: Option<&Path>) -> Result<RunnerConfig, RunnerError> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fs::try_exists(&default_path).await.unwrap_or(false) {
                    Self::from_file(&default_path).await?
                } else {
                    log::debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    RunnerConfig::default()
                }
            }
        };

        Self::apply_env_overrides(&mut config)?;
        validate_config(&config)?;
        Ok(config)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<RunnerConfig, RunnerError> {
        let path = path.as_ref();
        log::info!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|e| {
            RunnerError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<RunnerConfig, RunnerError> {
        if content.trim().is_empty() {
            return Ok(RunnerConfig::default());
        }

        let config: RunnerConfig = serde_yaml::from_str(content)
            .map_err(|e| RunnerError::ConfigError(format!("Failed to parse YAML: {}", e)))?;

        validate_config(&config)?;
        Ok(config)
    }

    pub fn apply_env_overrides(config: &mut RunnerConfig) -> Result<(), RunnerError> {
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                log::debug!("{} overrides execution endpoint", ENDPOINT_ENV);
                config.execution.endpoint = endpoint.trim().to_string();
            }
        }

        if let Ok(store) = env::var(STORE_ENV) {
            if !store.trim().is_empty() {
                config.storage.path = Some(PathBuf::from(store.trim()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        env::remove_var(ENDPOINT_ENV);
        env::remove_var(STORE_ENV);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        assert_eq!(ConfigLoader::from_str("").unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = ConfigLoader::from_str(
            r#"
execution:
  version: "3.10.0"
default_language: python
"#,
        )
        .unwrap();

        assert_eq!(config.execution.version, "3.10.0");
        assert_eq!(
            config.execution.endpoint,
            "https://emkc.org/api/v2/piston/execute"
        );
        assert_eq!(config.default_language, "python");
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let err = ConfigLoader::from_str("execution: [unclosed").unwrap_err();
        assert!(matches!(err, RunnerError::ConfigError(_)));
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_file_with_env_overrides() {
        clear_env();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "execution:\n  endpoint: http://localhost:2000/api/v2/execute\nstorage:\n  path: /tmp/from-file.json"
        )
        .unwrap();

        env::set_var(STORE_ENV, "/tmp/from-env.json");
        let config = ConfigLoader::load(Some(file.path())).await.unwrap();
        clear_env();

        assert_eq!(
            config.execution.endpoint,
            "http://localhost:2000/api/v2/execute"
        );
        assert_eq!(
            config.storage.resolved_path(),
            PathBuf::from("/tmp/from-env.json")
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_endpoint_override_is_validated() {
        clear_env();
        env::set_var(ENDPOINT_ENV, "localhost:2000");
        let result = ConfigLoader::load(None).await;
        clear_env();

        assert!(matches!(result, Err(RunnerError::ConfigError(_))));
    }

    #[test]
    fn test_legacy_timeout_key_does_not_change_the_limit() {
        let config = ConfigLoader::from_str("execution:\n  timeout_ms: 2500\n").unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_explicit_file_is_an_error() {
        let result = ConfigLoader::load(Some(Path::new("/definitely/not/here.yaml"))).await;
        assert!(matches!(result, Err(RunnerError::ConfigError(_))));
    }

    #[test]
    fn test_default_store_location() {
        let path = RunnerConfig::default().storage.resolved_path();
        assert!(path.ends_with("coderun/store.json"));
    }
}
