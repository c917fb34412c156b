use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no valid chunks to index")]
    EmptyInput,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No generative model available (tried: {0})")]
    ModelUnavailable(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure surface of a generative backend. `ModelNotFound` is the signal
/// that moves a fallback chain on to the next model identifier; everything
/// else is terminal for the request.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("backend request failed: {0}")]
    Other(String),
}
