// src/test_utils/mock_piston_server.rs
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

const EXECUTE_PATH: &str = "/api/v2/piston/execute";

#[derive(Debug, Clone)]
pub struct MockPistonResponse {
    pub status: u16,
    pub body: Value,
    pub delay: Duration,
}

impl MockPistonResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn error(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockServerState {
    responses: Arc<Mutex<VecDeque<MockPistonResponse>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn execute_handler(
    axum::extract::State(state): axum::extract::State<MockServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    log::debug!("Mock Piston server received request: {}", payload);
    state.requests.lock().unwrap().push(payload);

    let next = state.responses.lock().unwrap().pop_front();
    match next {
        Some(response) => {
            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(response.body))
        }
        None => {
            log::error!("Mock Piston server ran out of responses!");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"message": "mock exhausted"})),
            )
        }
    }
}

pub struct MockPistonServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    recorded_requests: Arc<Mutex<Vec<Value>>>,
}

impl MockPistonServer {
    pub async fn start(responses: Vec<MockPistonResponse>) -> Self {
        let state = MockServerState {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded_requests = state.requests.clone();

        let app = Router::new()
            .route(EXECUTE_PATH, post(execute_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock Piston server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock Piston server error: {}", e);
                });
        });

        MockPistonServer {
            addr,
            shutdown_tx,
            recorded_requests,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, EXECUTE_PATH)
    }

    /// An endpoint on a port nothing listens on.
    pub fn unused_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}{}", addr, EXECUTE_PATH)
    }

    pub fn get_requests(&self) -> Vec<Value> {
        self.recorded_requests.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock Piston server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
