use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Source Adapter Errors
    #[error("source unavailable: {retailer}: {reason}")]
    SourceUnavailable { retailer: String, reason: String },

    #[error("malformed price from {retailer}: {raw:?}")]
    MalformedPrice { retailer: String, raw: String },

    // Configuration Errors
    #[error("no retailers configured")]
    EmptyConfiguration,

    #[error("duplicate retailer in configuration: {0}")]
    DuplicateRetailer(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    // History Errors
    #[error("history invariant violation: {0}")]
    HistoryCorruption(InvariantViolation),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub invariant: &'static str,
    pub details: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.details)
    }
}
