//! Remote code execution.
//!
//! The runner never executes code itself. A `CodeExecutor` hands an
//! `ExecutionRequest` to an external service and reports what the service
//! captured. The execution flow owns timing, timeouts and the mapping of the
//! result into the output slot.

use async_trait::async_trait;

use crate::errors::{ExecutionError, RunnerError};
use crate::languages::LanguageRegistry;

pub mod piston;

pub use piston::PistonExecutor;

/// A single run, built fresh from the editor state each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub service_language_id: String,
    pub source_text: String,
    pub stdin: String,
}

impl ExecutionRequest {
    /// Source and stdin are taken verbatim; only the language id is translated.
    pub fn build(
        registry: &LanguageRegistry,
        language_id: &str,
        source_text: &str,
        stdin: &str,
    ) -> Result<Self, RunnerError> {
        let profile = registry.get(language_id)?;
        Ok(Self {
            service_language_id: profile.service_language_id.to_string(),
            source_text: source_text.to_string(),
            stdin: stdin.to_string(),
        })
    }
}

/// What the service captured for the run stage of a program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Combined stdout/stderr as reported by the service.
    pub output: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub exit_code: Option<i64>,
    pub signal: Option<String>,
    /// Output of the compile stage, for compiled languages.
    pub compile_output: Option<String>,
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionError>;
}
