use thiserror::Error;

/// Errors raised while talking to the Nano Banana backend.
///
/// These never leave [`ApiClient`](crate::ApiClient) calls directly; they are
/// folded into an [`ApiError`](crate::ApiError) and kept as its `details`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success HTTP status.
    #[error("{context}: {status} {status_text}")]
    Http {
        context: String,
        status: u16,
        status_text: String,
    },

    /// The backend answered 2xx but reported a failure in the body.
    #[error("{0}")]
    Api(String),

    /// Connection, TLS or timeout failure.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A configured header name or value cannot be sent.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Missing or malformed settings, e.g. an unset or non-numeric
    /// environment variable read by `ApiConfig::from_env`.
    #[error("configuration error: {0}")]
    Config(String),

    /// Well-formed JSON that is missing a field we rely on.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
