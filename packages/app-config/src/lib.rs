//! Environment-based application configuration.
//! Resolves process-wide settings once at startup; the resulting record is
//! read-only for the rest of the process lifetime.

pub mod env;
pub mod error;

pub use env::{AppConfig, RuntimeEnv};
pub use error::ConfigError;
