use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbBootstrapError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    /// Connection, authentication, and schema errors propagate unmodified.
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("Database unavailable: connect() has not completed on this manager")]
    NotConnected,
    #[error("Already connected: disconnect() before connecting again")]
    AlreadyConnected,
}

impl DbBootstrapError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
