use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Validation failure: {0}")]
    ValidationFailure(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
