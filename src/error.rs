use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportBuilderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Registry storage unavailable ({path}): {reason}")]
    StorageUnavailable { path: String, reason: String },

    #[error("No registered player matches the given name and account number")]
    NotFound,

    #[error("Invalid identity input: {0}")]
    InvalidIdentity(String),

    #[error("Metric '{metric}' is not numeric: '{value}'")]
    MetricCoercion { metric: &'static str, value: String },

    #[error("Model response contained no decodable image")]
    NoImageExtracted,

    #[error("Image generation API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Report requested before a successful identity step")]
    NoActivePlayer,

    #[cfg(feature = "gemini")]
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportBuilderError>;
