use crate::config::types::RunnerConfig;
use crate::errors::RunnerError;
use crate::languages::LanguageRegistry;

pub fn validate_config(config: &RunnerConfig) -> Result<(), RunnerError> {
    let endpoint = config.execution.endpoint.trim();
    if endpoint.is_empty() {
        return Err(RunnerError::ConfigError(
            "execution.endpoint must not be empty".to_string(),
        ));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(RunnerError::ConfigError(format!(
            "execution.endpoint must be an http(s) URL, got '{}'",
            endpoint
        )));
    }

    if config.execution.version.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "execution.version must not be empty (use \"*\" for latest)".to_string(),
        ));
    }

    let registry = LanguageRegistry::global();
    if !registry.contains(&config.default_language) {
        return Err(RunnerError::ConfigError(format!(
            "default_language '{}' is not supported. Supported languages are: {}",
            config.default_language,
            registry.ids().collect::<Vec<_>>().join(", ")
        )));
    }

    Ok(())
}
