use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;
use serde_json::Value;

use crate::transport::errors::{
    network_error, serialization_error, ErrorPathSegment, OperationErrorInfo, TransportError,
    TransportResult,
};
use crate::transport::{GraphQlRequest, NetworkTransport};

use async_trait::async_trait;

/// POSTs JSON request bodies to a single GraphQL endpoint.
///
/// The endpoint is stored verbatim and parsed per request, so a transport can
/// be constructed (and a client configured) without touching the network.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn endpoint_url(&self) -> TransportResult<Url> {
        Url::parse(&self.endpoint).map_err(|err| TransportError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: err.to_string(),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NetworkTransport for HttpTransport {
    async fn execute(&self, request: GraphQlRequest) -> TransportResult<Value> {
        let url = self.endpoint_url()?;

        let mut body = serde_json::Map::new();
        body.insert("query".to_string(), Value::String(request.query));
        if let Some(operation_name) = request.operation_name {
            body.insert("operationName".to_string(), Value::String(operation_name));
        }
        if !request.variables.is_null() {
            body.insert("variables".to_string(), request.variables);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        log::debug!(
            "executing GraphQL request against {}",
            self.endpoint
        );

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|err| network_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|err| serialization_error(err.to_string()))?;

        if !wire.errors.is_empty() {
            let errors = wire
                .errors
                .into_iter()
                .map(|error| OperationErrorInfo {
                    message: error
                        .message
                        .unwrap_or_else(|| "Unknown GraphQL error".to_string()),
                    path: error
                        .path
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|segment| match segment {
                            Value::String(field) => Some(ErrorPathSegment::Field(field)),
                            Value::Number(num) => num.as_i64().map(ErrorPathSegment::Index),
                            _ => None,
                        })
                        .collect(),
                })
                .collect();
            return Err(TransportError::Operation { errors });
        }

        Ok(wire.data.unwrap_or(Value::Null))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Deserialize)]
struct WireError {
    message: Option<String>,
    path: Option<Vec<Value>>,
}
