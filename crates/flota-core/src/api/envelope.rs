//! Uniform response wrapper returned by every data access call.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// A raw backend row: field name to scalar or nested value.
pub type Record = serde_json::Map<String, Value>;

/// Used when a failure carries no message of its own.
const GENERIC_FAILURE: &str = "Unknown error";

/// Success/failure wrapper. Fields are private so the only way to build one is
/// through [`Envelope::ok`] or [`Envelope::failed`]: a failure always has an
/// error and no data, a success never has an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Envelope {
    success: bool,
    #[cfg_attr(feature = "ts", ts(type = "Array<Record<string, unknown>>"))]
    data: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(type = "number | null"))]
    count: Option<u64>,
}

impl Envelope {
    pub fn ok(data: Vec<Record>, count: Option<u64>) -> Self {
        let count = count.or(Some(data.len() as u64));
        Self {
            success: true,
            data,
            error: None,
            count,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = GENERIC_FAILURE.to_string();
        }
        Self {
            success: false,
            data: Vec::new(),
            error: Some(message),
            count: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Record> {
        self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// First record, if any. Used by get-by-id callers.
    pub fn first(&self) -> Option<&Record> {
        self.data.first()
    }

    /// Convert the raw records into typed entities.
    ///
    /// A failed envelope decodes to an `InvalidResponse` error carrying its
    /// message; any record that does not fit `T` fails the whole decode.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        if let Some(ref error) = self.error {
            return Err(ApiError::InvalidResponse(error.clone()));
        }
        self.data
            .iter()
            .map(|record| serde_json::from_value(Value::Object(record.clone())).map_err(ApiError::from))
            .collect()
    }

    /// Decode only the first record. `Ok(None)` when the envelope is empty.
    pub fn decode_first<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        if let Some(ref error) = self.error {
            return Err(ApiError::InvalidResponse(error.clone()));
        }
        match self.data.first() {
            Some(record) => Ok(Some(serde_json::from_value(Value::Object(record.clone()))?)),
            None => Ok(None),
        }
    }
}
