use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Model name the backend expects and echoes back in result metadata.
pub const MODEL_NAME: &str = "NANO BANANA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    GenerationFailed,
    PollingFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
            ErrorCode::PollingFailed => "POLLING_FAILED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure value returned in place of a result.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// The error that caused this failure, when one was raised.
    #[serde(skip)]
    pub details: Option<Arc<ClientError>>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Wraps a raised error, taking its display text as the message.
    pub fn from_error(code: ErrorCode, error: ClientError) -> Self {
        Self {
            code,
            message: error.to_string(),
            details: Some(Arc::new(error)),
        }
    }

    pub fn details(&self) -> Option<&ClientError> {
        self.details.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.details
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
