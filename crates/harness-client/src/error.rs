//! Client Errors
//!
//! Every failure a dashboard action can hit. None of them are retried;
//! callers log and turn them into a transient notification.

/// Common result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response; message is the server's `error` field or a status line
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Server rejected the session token; the session has been torn down
    #[error("Authentication required")]
    Unauthorized,

    /// Tried to decorate a request without a token
    #[error("No authentication token available")]
    MissingToken,

    /// Client-side input check failed before any request was made
    #[error("{0}")]
    Validation(String),

    /// Response body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Durable key-value storage failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
