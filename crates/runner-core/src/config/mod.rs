//! Runner configuration: YAML file, environment overrides and validation.

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::ConfigLoader;
pub use types::*;
pub use validation::validate_config;
