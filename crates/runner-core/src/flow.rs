//! Execution request flow.
//!
//! Governs a single run from the moment the user asks for it until its
//! outcome lands in the output slot:
//!
//! ```text
//! Idle -> Dispatching -> Succeeded
//!                     -> Failed(Timeout | NetworkError | ServiceError)
//! ```
//!
//! At most one request is in flight. `begin` hands out a [`Dispatch`] ticket
//! only when the flow is not already dispatching and the source is not blank;
//! the ticket is consumed by `resolve` (or `abandon`). Every ticket carries the generation it
//! was issued under. `invalidate` bumps the generation, so a response that
//! arrives after a language switch or an editor reset is discarded instead of
//! overwriting the fresh output slot.

use std::time::Duration;

use tokio::time::Instant;

use crate::errors::{ExecutionError, RunnerError};
use crate::executors::piston::EXECUTION_TIMEOUT;
use crate::executors::{CodeExecutor, ExecutionRequest, ExecutionResult};
use crate::languages::LanguageRegistry;

/// Leading text of every failure rendered into the output slot. Shells key
/// their error styling off this prefix.
pub const ERROR_PREFIX: &str = "Error: ";
pub const NO_OUTPUT: &str = "No output";
pub const NETWORK_ERROR_MESSAGE: &str = "Failed to connect to execution service";
pub const SERVICE_ERROR_FALLBACK: &str = "Execution failed";
pub const TIMEOUT_MESSAGE: &str = "Execution timed out (10s limit)";

/// Terminal result of one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success {
        output_text: String,
        elapsed_seconds: f64,
    },
    Timeout,
    NetworkError,
    ServiceError {
        message: String,
    },
}

impl ExecutionOutcome {
    pub fn from_result(
        result: Result<ExecutionResult, ExecutionError>,
        elapsed: Duration,
    ) -> Self {
        match result {
            Ok(result) => ExecutionOutcome::Success {
                output_text: select_output(result),
                elapsed_seconds: elapsed.as_secs_f64(),
            },
            Err(ExecutionError::Timeout) => ExecutionOutcome::Timeout,
            Err(ExecutionError::Network(reason)) => {
                log::warn!("Execution service unreachable: {}", reason);
                ExecutionOutcome::NetworkError
            }
            Err(ExecutionError::Service { message, .. }) => ExecutionOutcome::ServiceError {
                message: message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| SERVICE_ERROR_FALLBACK.to_string()),
            },
        }
    }
}

// Combined output wins, then stderr, then the placeholder.
fn select_output(result: ExecutionResult) -> String {
    [result.output, result.stderr]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| NO_OUTPUT.to_string())
}

/// Elapsed seconds as shown next to the output, always two decimals.
pub fn format_elapsed(elapsed_seconds: f64) -> String {
    format!("{:.2}", elapsed_seconds)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Timeout,
    NetworkError,
    ServiceError(String),
}

impl Failure {
    pub fn message(&self) -> String {
        match self {
            Failure::Timeout => TIMEOUT_MESSAGE.to_string(),
            Failure::NetworkError => NETWORK_ERROR_MESSAGE.to_string(),
            Failure::ServiceError(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    Idle,
    Dispatching,
    Succeeded,
    Failed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The ticket was issued before the last `invalidate`.
    Discarded,
}

/// Ticket for the single in-flight request.
#[derive(Debug)]
pub struct Dispatch {
    generation: u64,
    request: ExecutionRequest,
    started_at: Instant,
}

impl Dispatch {
    pub fn request(&self) -> &ExecutionRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sends the request, bounded by the 10 second limit. Never retries.
    pub async fn execute(&self, executor: &dyn CodeExecutor) -> ExecutionOutcome {
        let result = match tokio::time::timeout(EXECUTION_TIMEOUT, executor.execute(&self.request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ExecutionError::Timeout),
        };

        ExecutionOutcome::from_result(result, self.started_at.elapsed())
    }
}

#[derive(Debug)]
pub struct ExecutionFlow {
    status: FlowStatus,
    generation: u64,
    output: String,
    elapsed: Option<String>,
}

impl Default for ExecutionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionFlow {
    pub fn new() -> Self {
        Self {
            status: FlowStatus::Idle,
            generation: 0,
            output: String::new(),
            elapsed: None,
        }
    }

    pub fn status(&self) -> &FlowStatus {
        &self.status
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn elapsed(&self) -> Option<&str> {
        self.elapsed.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        EXECUTION_TIMEOUT
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dispatching(&self) -> bool {
        self.status == FlowStatus::Dispatching
    }

    pub fn is_error(&self) -> bool {
        self.output.starts_with(ERROR_PREFIX)
    }

    /// Whether the run control should be enabled for `source_text`.
    pub fn can_run(&self, source_text: &str) -> bool {
        !self.is_dispatching() && !source_text.trim().is_empty()
    }

    /// Moves to `Dispatching` and returns the ticket, or `None` when a request
    /// is already in flight or the source is blank.
    pub fn begin(
        &mut self,
        registry: &LanguageRegistry,
        language_id: &str,
        source_text: &str,
        stdin: &str,
    ) -> Result<Option<Dispatch>, RunnerError> {
        if self.is_dispatching() {
            log::debug!("Run ignored: a request is already in flight");
            return Ok(None);
        }
        if source_text.trim().is_empty() {
            log::debug!("Run ignored: source is blank");
            return Ok(None);
        }

        let request = ExecutionRequest::build(registry, language_id, source_text, stdin)?;

        self.status = FlowStatus::Dispatching;
        self.output.clear();
        self.elapsed = None;

        log::info!(
            "Dispatching {} run (generation {})",
            request.service_language_id,
            self.generation
        );

        Ok(Some(Dispatch {
            generation: self.generation,
            request,
            started_at: Instant::now(),
        }))
    }

    /// Applies the outcome of `dispatch` to the output slot, unless the flow was
    /// invalidated while the request was in flight.
    pub fn resolve(&mut self, dispatch: Dispatch, outcome: ExecutionOutcome) -> Resolution {
        if !self.is_dispatching() {
            log::warn!("Outcome arrived while no request was in flight; ignoring it");
            return Resolution::Discarded;
        }

        if dispatch.generation != self.generation {
            log::info!(
                "Discarding stale outcome (generation {} is now {})",
                dispatch.generation,
                self.generation
            );
            self.status = FlowStatus::Idle;
            return Resolution::Discarded;
        }

        match outcome {
            ExecutionOutcome::Success {
                output_text,
                elapsed_seconds,
            } => {
                self.output = output_text;
                self.elapsed = Some(format_elapsed(elapsed_seconds));
                self.status = FlowStatus::Succeeded;
            }
            ExecutionOutcome::Timeout => self.fail(Failure::Timeout),
            ExecutionOutcome::NetworkError => self.fail(Failure::NetworkError),
            ExecutionOutcome::ServiceError { message } => {
                self.fail(Failure::ServiceError(message))
            }
        }

        Resolution::Applied
    }

    fn fail(&mut self, failure: Failure) {
        self.output = format!("{}{}", ERROR_PREFIX, failure.message());
        self.elapsed = None;
        self.status = FlowStatus::Failed(failure);
    }

    /// Releases the run slot held by `dispatch` without applying an outcome.
    /// Use it when a ticket is dropped instead of resolved.
    pub fn abandon(&mut self, dispatch: Dispatch) {
        self.release(dispatch.generation);
    }

    // While dispatching there is exactly one live ticket, so whichever ticket
    // is released holds the slot, even if it went stale through `invalidate`.
    fn release(&mut self, generation: u64) {
        if !self.is_dispatching() {
            return;
        }
        log::debug!(
            "Run abandoned (ticket generation {}, flow generation {})",
            generation,
            self.generation
        );
        self.status = FlowStatus::Idle;
    }

    /// Begin, execute and resolve in one go. `None` when the run was a no-op.
    /// Dropping the returned future mid-flight frees the run slot.
    pub async fn run(
        &mut self,
        executor: &dyn CodeExecutor,
        registry: &LanguageRegistry,
        language_id: &str,
        source_text: &str,
        stdin: &str,
    ) -> Result<Option<Resolution>, RunnerError> {
        let Some(dispatch) = self.begin(registry, language_id, source_text, stdin)? else {
            return Ok(None);
        };

        let mut in_flight = InFlight {
            flow: self,
            generation: dispatch.generation,
            settled: false,
        };
        let outcome = dispatch.execute(executor).await;
        in_flight.settled = true;
        Ok(Some(in_flight.flow.resolve(dispatch, outcome)))
    }

    /// Forgets whatever is displayed and orphans the in-flight request, if any.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.output.clear();
        self.elapsed = None;
        if matches!(self.status, FlowStatus::Succeeded | FlowStatus::Failed(_)) {
            self.status = FlowStatus::Idle;
        }
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.elapsed = None;
    }
}

/// Frees the run slot if an in-flight `run` is dropped before it resolves.
struct InFlight<'a> {
    flow: &'a mut ExecutionFlow,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.flow.release(self.generation);
        }
    }
}
