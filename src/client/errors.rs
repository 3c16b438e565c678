use std::fmt;

use crate::transport::TransportError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ClientError {
    /// The configured root key is empty.
    BadRootKey,
    /// A caller-supplied store has no sub-tree at the configured root key,
    /// meaning the client's reducer was never mounted into it.
    MisconfiguredStore { root_key: String },
    /// A store is already adopted and a different one was offered.
    StoreAlreadyAdopted,
    /// Collaborator failure, passed through verbatim.
    Query(TransportError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::BadRootKey => {
                write!(f, "The reducer root key must be a non-empty string")
            }
            ClientError::MisconfiguredStore { root_key } => write!(
                f,
                "Existing store does not use the client reducer: no state found at '{root_key}'. \
                 Either let the client create its own store, or mount the client reducer under \
                 '{root_key}' when building the store."
            ),
            ClientError::StoreAlreadyAdopted => write!(
                f,
                "The client already manages a store; installing it into a second store is a \
                 configuration error"
            ),
            ClientError::Query(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Query(err)
    }
}
