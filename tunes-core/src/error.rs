use thiserror::Error;

/// Closed failure taxonomy surfaced by the request pipeline and image cache.
///
/// Every failed request resolves to exactly one of these values; nothing
/// unwinds past the async boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The descriptor could not become a request target.
    #[error("Path encode error: {0}")]
    Encoding(String),

    /// Connection-level failure (DNS, TCP, TLS, body stream).
    #[error("Network connection failed: {0}")]
    Transport(String),

    /// The round trip exceeded its configured bound.
    #[error("Request timed out.")]
    Timeout,

    /// Status outside 2xx, or no body at all.
    #[error("There is a problem with the server. Please try again.")]
    BadResponse { status: Option<u16> },

    /// The body did not match the expected response shape.
    #[error("Unexpected response format: {0}")]
    Decode(String),

    #[error("Something went wrong. Please try again.")]
    Unknown(String),
}

/// Payload-free tag of a [`NetworkError`], handy for matching and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Encoding,
    Transport,
    Timeout,
    BadResponse,
    Decode,
    Unknown,
}

impl NetworkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::Encoding(_) => ErrorKind::Encoding,
            NetworkError::Transport(_) => ErrorKind::Transport,
            NetworkError::Timeout => ErrorKind::Timeout,
            NetworkError::BadResponse { .. } => ErrorKind::BadResponse,
            NetworkError::Decode(_) => ErrorKind::Decode,
            NetworkError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Whether repeating the same request can reasonably succeed.
    ///
    /// Server errors and throttling are retryable; other non-2xx statuses
    /// and contract failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Transport(_) | NetworkError::Timeout => true,
            NetworkError::BadResponse { status } => match status {
                Some(code) => *code >= 500 || *code == 408 || *code == 429,
                None => true,
            },
            NetworkError::Encoding(_)
            | NetworkError::Decode(_)
            | NetworkError::Unknown(_) => false,
        }
    }
}

/// Result of one pipeline invocation.
pub type Outcome<T> = std::result::Result<T, NetworkError>;

/// Failures reported by a [`crate::Transport`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport timed out")]
    TimedOut,

    #[error("transport failure: {0}")]
    Other(String),
}

impl From<TransportError> for NetworkError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(msg) => NetworkError::Transport(msg),
            TransportError::TimedOut => NetworkError::Timeout,
            TransportError::Other(msg) => NetworkError::Unknown(msg),
        }
    }
}

/// A body that does not match the expected response shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<DecodeError> for NetworkError {
    fn from(err: DecodeError) -> Self {
        NetworkError::Decode(err.0)
    }
}
