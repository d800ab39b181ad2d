use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Runtime environment, governing logging verbosity and destructive-sync
/// behavior downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Test,
    Production,
}

impl RuntimeEnv {
    /// Parse the lowercase environment name. Returns `None` for anything
    /// outside the three known modes.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "test" => Some(Self::Test),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_test(self) -> bool {
        self == Self::Test
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for RuntimeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        };
        f.write_str(name)
    }
}

// Substituted for absent secrets outside production. Deliberately worthless
// values; production refuses to start without real secrets.
const DEV_ACCESS_TOKEN_SECRET: &str = "access_token_secret_for_dev_only";
const DEV_REFRESH_TOKEN_SECRET: &str = "refresh_token_secret_for_dev_only";

/// Process-wide configuration resolved from environment variables.
/// Constructed once at startup, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen port for the embedding application.
    pub port: u16,
    pub env: RuntimeEnv,
    /// Credential hashing cost factor.
    pub hash_cost: u32,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
}

impl AppConfig {
    /// Resolve configuration from the ambient process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve configuration against an injected lookup. An empty value is
    /// treated the same as an absent one.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| get(name).filter(|value| !value.is_empty());

        let env = runtime_env(&get)?;
        Ok(Self {
            port: parsed_var(&get, "PORT", 8080u16, "expected a port number")?,
            env,
            hash_cost: parsed_var(&get, "SALT_ROUNDS", 10u32, "expected an integer")?,
            access_token_secret: secret(
                &get,
                "JWT_ACCESS_TOKEN_SECRET",
                DEV_ACCESS_TOKEN_SECRET,
                env,
            )?,
            refresh_token_secret: secret(
                &get,
                "JWT_REFRESH_TOKEN_SECRET",
                DEV_REFRESH_TOKEN_SECRET,
                env,
            )?,
        })
    }
}

fn runtime_env<F>(get: &F) -> Result<RuntimeEnv, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get("NODE_ENV") {
        None => Ok(RuntimeEnv::Production),
        Some(raw) => RuntimeEnv::parse(&raw).ok_or_else(|| {
            ConfigError::invalid(
                "NODE_ENV",
                &raw,
                "expected one of development, test, production",
            )
        }),
    }
}

/// Absent variable falls back to the default; a set-but-unparsable value is a
/// reportable misconfiguration, not a silent fallback.
fn parsed_var<F, T>(
    get: &F,
    name: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::invalid(name, &raw, reason)),
    }
}

fn secret<F>(
    get: &F,
    name: &'static str,
    dev_default: &str,
    env: RuntimeEnv,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => Ok(value),
        None if env.is_production() => Err(ConfigError::missing_secret(name, env)),
        None => Ok(dev_default.to_string()),
    }
}
