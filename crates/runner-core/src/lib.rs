//! Core of a multi-language code runner.
//!
//! A user picks one of a fixed set of languages, edits source text, optionally
//! supplies stdin, and sends the program to a remote Piston execution service.
//! Output (or a prefixed error) lands in a single output slot together with the
//! elapsed wall-clock time.
//!
//! # Layout
//!
//! - **languages**: the static language registry and its lookups
//! - **executors**: the [`CodeExecutor`] seam and the Piston HTTP client
//! - **flow**: the one-request-at-a-time execution state machine
//! - **storage**: key-value stores plus the draft/preference adapter
//! - **session**: editor state that ties the above together for a shell
//! - **config**: YAML configuration with environment overrides

pub mod config;
pub mod errors;
pub mod executors;
pub mod flow;
pub mod languages;
pub mod preferences;
pub mod session;
pub mod storage;

pub use config::*;
pub use errors::{ExecutionError, RunnerError, StorageError};
pub use executors::{CodeExecutor, ExecutionRequest, ExecutionResult, PistonExecutor};
pub use flow::{ExecutionFlow, ExecutionOutcome, FlowStatus, Resolution};
pub use languages::{LanguageProfile, LanguageRegistry};
pub use preferences::SessionPreferences;
pub use session::{EditorSession, ExportedFile};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistenceAdapter};

#[cfg(test)]
pub mod test_utils;
