//! Client for the Piston v2 `execute` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CodeExecutor, ExecutionRequest, ExecutionResult};
use crate::config::ExecutionConfig;
use crate::errors::ExecutionError;

pub const DEFAULT_PISTON_ENDPOINT: &str = "https://emkc.org/api/v2/piston/execute";
pub const EXECUTION_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Serialize)]
struct PistonExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
    stdin: &'a str,
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct PistonExecuteResponse {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    run: Option<PistonStage>,
    #[serde(default)]
    compile: Option<PistonStage>,
}

#[derive(Debug, Default, Deserialize)]
struct PistonStage {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    signal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PistonErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP executor for a hosted Piston instance
pub struct PistonExecutor {
    endpoint: String,
    version: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl PistonExecutor {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            version: "*".to_string(),
            client: reqwest::Client::new(),
            timeout: EXECUTION_TIMEOUT,
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.endpoint.clone()).with_version(config.version.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_version(mut self, version: String) -> Self {
        self.version = version;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionError> {
        let payload = PistonExecuteRequest {
            language: &request.service_language_id,
            version: &self.version,
            files: vec![PistonFile {
                content: &request.source_text,
            }],
            stdin: &request.stdin,
        };

        log::debug!(
            "Posting {} bytes of {} source to {}",
            request.source_text.len(),
            request.service_language_id,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            // The status already classifies the failure; a body that cannot be
            // read only costs the message.
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) if e.is_timeout() => return Err(ExecutionError::Timeout),
                Err(e) => {
                    log::debug!("Could not read error body: {}", e);
                    String::new()
                }
            };
            let message = serde_json::from_str::<PistonErrorBody>(&body)
                .ok()
                .and_then(|error_body| error_body.message);
            log::warn!(
                "Execution service returned {}: {}",
                status,
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(ExecutionError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: PistonExecuteResponse = serde_json::from_str(&body).map_err(|e| {
            log::warn!("Unreadable execution service response: {}", e);
            ExecutionError::Service {
                status: status.as_u16(),
                message: None,
            }
        })?;

        let Some(run) = parsed.run else {
            log::warn!("Execution service response has no run stage");
            return Err(ExecutionError::Service {
                status: status.as_u16(),
                message: None,
            });
        };

        log::info!(
            "Executed {} {} (exit code {:?}, signal {:?})",
            parsed.language.as_deref().unwrap_or(&request.service_language_id),
            parsed.version.as_deref().unwrap_or("?"),
            run.code,
            run.signal
        );

        Ok(ExecutionResult {
            output: run.output,
            stdout: run.stdout,
            stderr: run.stderr,
            exit_code: run.code,
            signal: run.signal,
            compile_output: parsed.compile.and_then(|stage| stage.output),
        })
    }
}
