//! Error taxonomy.
//!
//! Transport failures pass through untouched. The only error raised locally
//! is a response body that does not decode as JSON.

use thiserror::Error;
use tineye_auth::CredentialsError;

/// Failure reported by the transport. Never retried at this layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, TCP or TLS failure before a response arrived.
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Non-2xx response. `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    /// HTTP status code, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401/403: usually a signature the server did not reproduce, or a bad key.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Error returned by every [`crate::ApiClient`] operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a JSON document. `body` is the raw text.
    #[error("Failed to parse: {body}")]
    ResponseParse { body: String, reason: String },

    /// A caller-supplied upload reader failed while being drained.
    #[error("failed to read upload data: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),
}

impl ApiError {
    /// Undecoded body of a response that failed to parse.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            ApiError::ResponseParse { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
