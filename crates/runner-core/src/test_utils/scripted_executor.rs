use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::ExecutionError;
use crate::executors::{CodeExecutor, ExecutionRequest, ExecutionResult};

/// In-process executor replaying canned results, optionally after a delay.
pub struct ScriptedExecutor {
    results: Mutex<VecDeque<Result<ExecutionResult, ExecutionError>>>,
    requests: Mutex<Vec<ExecutionRequest>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedExecutor {
    pub fn new(results: Vec<Result<ExecutionResult, ExecutionError>>) -> Self {
        Self {
            results: Mutex::new(VecDeque::from(results)),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn output(text: &str) -> Self {
        Self::new(vec![Ok(ExecutionResult {
            output: Some(text.to_string()),
            ..Default::default()
        })])
    }

    /// Never answers within any sane timeout.
    pub fn hanging() -> Self {
        Self::output("too late").with_delay(Duration::from_secs(3600))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for ScriptedExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ExecutionError::Network("script exhausted".to_string())))
    }
}
