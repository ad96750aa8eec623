use thiserror::Error;

/// Error type that captures storage, config, and CLI failures.
///
/// The projection core never produces these: it is a total function and
/// signals failure through `Option` instead.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
