use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("{service} is not configured")]
    NotConfigured { service: String },

    #[error("Generative service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("HTTP status error: {status}")]
    ServiceStatus { status: u16 },

    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Document parsing error: {reason}")]
    DocumentParse { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },
}

impl ForgeError {
    /// Errors that may succeed on retry: network failures, timeouts, rate
    /// limits and server-side statuses.
    pub fn is_transient(&self) -> bool {
        match self {
            ForgeError::Http(_)
            | ForgeError::ServiceUnavailable { .. }
            | ForgeError::Timeout { .. } => true,
            ForgeError::ServiceStatus { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
