use thiserror::Error;

/// Errors surfaced by the `almanac` binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RecurError(#[from] almanac_recur::error::RecurError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    /// The request file could not be read or deserialized.
    #[error("Invalid request: {0}")]
    RequestError(#[from] config::ConfigError),

    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),

    #[error("Failed to encode occurrence: {0}")]
    EncodeError(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
