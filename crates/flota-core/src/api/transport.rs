//! Network boundary of the data access layer.
//!
//! `Transport` performs exactly one HTTP exchange and hands back the raw
//! status, headers of interest and body text. Interpreting that response is
//! the executor's job, so any transport (including the scripted one used in
//! tests) gets identical normalization.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde_json::Value;

use super::ApiError;

/// Path prefix of the REST interface under the project URL.
const REST_PREFIX: &str = "/rest/v1";

/// Asks the backend to echo the affected rows on writes.
const PREFER_REPRESENTATION: &str = "return=representation";

/// HTTP verb plus optional JSON body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operation {
    #[default]
    Get,
    Post(Value),
    Patch(Value),
    Delete,
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Operation::Get => Method::GET,
            Operation::Post(_) => Method::POST,
            Operation::Patch(_) => Method::PATCH,
            Operation::Delete => Method::DELETE,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Operation::Post(body) | Operation::Patch(body) => Some(body),
            Operation::Get | Operation::Delete => None,
        }
    }
}

/// What came back from the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_range: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. `endpoint` is the resource path with its query
    /// string already embedded, e.g. `/marcas?select=*`.
    ///
    /// Only failures to complete the exchange are errors; a non-2xx status is
    /// still `Ok`.
    async fn send(&self, endpoint: &str, operation: &Operation) -> Result<RawResponse, ApiError>;
}

/// reqwest-backed transport against the hosted REST interface.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, REST_PREFIX, endpoint)
    }

    fn headers(&self) -> Result<header::HeaderMap, ApiError> {
        let invalid = |_| ApiError::InvalidResponse("API key contains invalid header characters".to_string());

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(&self.api_key).map_err(invalid)?);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(invalid)?,
        );
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        headers.insert("prefer", header::HeaderValue::from_static(PREFER_REPRESENTATION));
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: &str, operation: &Operation) -> Result<RawResponse, ApiError> {
        let mut request = self
            .client
            .request(operation.method(), self.url(endpoint))
            .headers(self.headers()?);
        if let Some(body) = operation.body() {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let content_range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            content_range,
            body,
        })
    }
}
