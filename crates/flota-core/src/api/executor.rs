//! Request executor: one network call, normalized into an [`Envelope`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{Envelope, Record};
use super::transport::{Operation, RawResponse, Transport};
use super::ApiError;

#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Perform one call. Never fails: every error becomes a failed envelope.
    pub async fn execute(&self, endpoint: &str, operation: Operation) -> Envelope {
        debug!(endpoint = %endpoint, method = %operation.method(), "Executing query");

        match self.try_execute(endpoint, &operation).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(endpoint = %endpoint, method = %operation.method(), error = %e, "API request failed");
                Envelope::failed(e.to_string())
            }
        }
    }

    async fn try_execute(&self, endpoint: &str, operation: &Operation) -> Result<Envelope, ApiError> {
        let raw = self.transport.send(endpoint, operation).await?;
        normalize(raw)
    }
}

/// Turn a raw response into a successful envelope, or the error describing
/// why it isn't one.
fn normalize(raw: RawResponse) -> Result<Envelope, ApiError> {
    if !raw.is_success() {
        return Err(ApiError::from_status(raw.status, &raw.body));
    }

    let data = parse_records(&raw.body)?;
    let count = raw.content_range.as_deref().and_then(total_from_content_range);
    Ok(Envelope::ok(data, count))
}

/// Parse a body into a sequence of records. A bare object becomes a single
/// record; an empty body (e.g. 204 No Content) becomes no records.
fn parse_records(body: &str) -> Result<Vec<Record>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response body: {}", e)))?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(ApiError::InvalidResponse(format!(
                    "Expected a record at index {}, got {}",
                    i,
                    json_kind(&other)
                ))),
            })
            .collect(),
        other => Err(ApiError::InvalidResponse(format!(
            "Expected a record or list of records, got {}",
            json_kind(&other)
        ))),
    }
}

/// Total row count from a `Content-Range` header such as `0-24/3573`.
/// Returns `None` when the total is unknown (`*`) or unparseable.
fn total_from_content_range(header: &str) -> Option<u64> {
    header.split('/').nth(1)?.trim().parse().ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
