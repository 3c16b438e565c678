use std::fmt;

pub type TransportResult<T> = Result<T, TransportError>;

/// Error path segment reported by the server for a failed field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorPathSegment {
    Field(String),
    Index(i64),
}

/// A single entry from the `errors` array of a GraphQL response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationErrorInfo {
    pub message: String,
    pub path: Vec<ErrorPathSegment>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransportError {
    InvalidEndpoint { endpoint: String, reason: String },
    Network { message: String },
    Status { status: u16 },
    Operation { errors: Vec<OperationErrorInfo> },
    Serialization { message: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidEndpoint { endpoint, reason } => {
                write!(f, "Invalid GraphQL endpoint '{endpoint}': {reason}")
            }
            TransportError::Network { message } => write!(f, "Network error: {message}"),
            TransportError::Status { status } => {
                write!(f, "GraphQL request failed with status {status}")
            }
            TransportError::Operation { errors } => {
                let first = errors
                    .first()
                    .map(|error| error.message.as_str())
                    .unwrap_or("unknown error");
                write!(f, "GraphQL operation failed: {first} ({} total)", errors.len())
            }
            TransportError::Serialization { message } => {
                write!(f, "Malformed GraphQL response: {message}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

pub fn network_error(message: impl Into<String>) -> TransportError {
    TransportError::Network {
        message: message.into(),
    }
}

pub fn serialization_error(message: impl Into<String>) -> TransportError {
    TransportError::Serialization {
        message: message.into(),
    }
}
