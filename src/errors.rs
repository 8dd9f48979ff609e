use thiserror::Error;

/// Error type that captures validation and persistence failures of the tracker core.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("Invalid rate for {currency}: {rate}")]
    InvalidRate { currency: String, rate: f64 },
    #[error("Invalid budget amount: {0} (must be greater than zero)")]
    InvalidBudget(f64),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
