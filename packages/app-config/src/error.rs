use thiserror::Error;

use crate::env::RuntimeEnv;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but its value could not be used. Distinct from an
    /// absent variable, which falls back to the documented default.
    #[error("invalid value for {name}: {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    /// A secret with no safe fallback was absent in a mode that requires it.
    #[error("required environment variable '{name}' is not set (required in {env} mode)")]
    MissingSecret {
        name: &'static str,
        env: RuntimeEnv,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, value: &str, reason: &'static str) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub fn missing_secret(name: &'static str, env: RuntimeEnv) -> Self {
        Self::MissingSecret { name, env }
    }
}
