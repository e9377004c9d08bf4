use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanionError {
    #[error("Speech recognition is not supported in this environment")]
    CapabilityUnavailable,

    #[error("Speech capture failed: {0}")]
    Capture(String),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompanionError>;
