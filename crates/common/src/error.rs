//! Error types shared across Invigil crates.

/// Top-level error type for Invigil operations.
#[derive(Debug, thiserror::Error)]
pub enum InvigilError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame capture error: {message}")]
    Capture { message: String },

    #[error("Detection service error: {message}")]
    Detection { message: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using InvigilError.
pub type InvigilResult<T> = Result<T, InvigilError>;

impl InvigilError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot {
            message: msg.into(),
        }
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch {
            message: msg.into(),
        }
    }
}
