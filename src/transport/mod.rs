//! The network transport contract and the default HTTP implementation.
//!
//! A transport sends one operation document to a server and returns the raw
//! `data` payload or an error; it performs no caching and no retries. The
//! client is handed a transport at construction time and never builds one
//! implicitly.

mod errors;
mod http;

use async_trait::async_trait;
use serde_json::Value;

pub use errors::{
    network_error, serialization_error, ErrorPathSegment, OperationErrorInfo, TransportError,
    TransportResult,
};
pub use http::HttpTransport;

/// Endpoint used when the caller does not supply a transport.
pub const DEFAULT_ENDPOINT: &str = "/graphql";

/// Wire payload for a single query or mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQlRequest {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Value,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NetworkTransport: Send + Sync {
    /// Executes one request, returning the response `data` payload.
    ///
    /// A response carrying a non-empty `errors` array maps to
    /// [`TransportError::Operation`].
    async fn execute(&self, request: GraphQlRequest) -> TransportResult<Value>;

    /// The endpoint this transport talks to, for inspection.
    fn endpoint(&self) -> &str;
}

/// Builds the standard HTTP transport for the given endpoint.
pub fn create_network_transport(endpoint: impl Into<String>) -> HttpTransport {
    HttpTransport::new(endpoint)
}
