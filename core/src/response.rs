//! The response envelope every resource call returns.
//!
//! # Design
//! The API reports outcomes inconsistently: a `status` field in the body that
//! usually mirrors the HTTP status, an optional top-level `message`, an
//! optional `errors` array, an optional `warnings` array, and for batch
//! creates per-item `errors` / `warnings` under `resource.items`. Entries are
//! either plain strings or objects with a `message`. All of that is decoded
//! once, here, into a `Response` whose derived fields never change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Summary used when a failed response carries no message of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One entry of an `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The request field the error refers to, when the API names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            field: None,
            kind: None,
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    resource: Option<Value>,
    #[serde(default)]
    warnings: Option<Value>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNotice {
    Text(String),
    Detailed {
        message: Value,
        #[serde(default)]
        code: Option<Value>,
        #[serde(default)]
        field: Option<Value>,
        #[serde(default, rename = "type")]
        kind: Option<Value>,
    },
    Other(Value),
}

impl RawNotice {
    fn into_validation_error(self) -> ValidationError {
        match self {
            RawNotice::Text(message) => ValidationError::new(message),
            RawNotice::Detailed {
                message,
                code,
                field,
                kind,
            } => ValidationError {
                message: text(message).unwrap_or_default(),
                code: code.and_then(text),
                field: field.and_then(text),
                kind: kind.and_then(text),
            },
            RawNotice::Other(value) => ValidationError::new(value.to_string()),
        }
    }

    fn into_message(self) -> String {
        self.into_validation_error().message
    }
}

/// Render a scalar as text; null becomes `None`.
fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Normalized result of one API call.
///
/// Check `ok()` before trusting `resource()`: a "not found" or a validation
/// failure is a perfectly valid `Response`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    http_status: u16,
    status: u16,
    ok: bool,
    message: Option<String>,
    resource: Option<Value>,
    warnings: Vec<String>,
    validation_errors: Vec<ValidationError>,
    error_summary: Option<String>,
    body: Value,
}

impl Response {
    /// Decode a raw body. Fails only when the body is not a JSON object.
    pub fn from_json(http_status: u16, body: &str) -> Result<Self> {
        Self::from_slice(http_status, body.as_bytes())
    }

    /// Decode raw body bytes; invalid UTF-8 is malformed like invalid JSON.
    pub fn from_slice(http_status: u16, body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::MalformedResponse {
            status: http_status,
            reason: e.to_string(),
        })?;
        Self::from_value(http_status, value)
    }

    pub fn from_value(http_status: u16, body: Value) -> Result<Self> {
        if !body.is_object() {
            return Err(ApiError::MalformedResponse {
                status: http_status,
                reason: format!("expected a JSON object, got {}", kind_of(&body)),
            });
        }
        let raw: RawEnvelope =
            serde_json::from_value(body.clone()).map_err(|e| ApiError::MalformedResponse {
                status: http_status,
                reason: e.to_string(),
            })?;

        let status = raw
            .status
            .as_ref()
            .and_then(status_code)
            .unwrap_or(http_status);
        let mut validation_errors: Vec<ValidationError> = notices(raw.errors)
            .into_iter()
            .map(RawNotice::into_validation_error)
            .collect();
        let ok = (200..300).contains(&status) && validation_errors.is_empty();

        let mut warnings: Vec<String> = notices(raw.warnings)
            .into_iter()
            .map(RawNotice::into_message)
            .collect();
        for item in resource_items(raw.resource.as_ref()) {
            let nested = |key: &str| notices(item.get(key).cloned());
            warnings.extend(nested("warnings").into_iter().map(RawNotice::into_message));
            validation_errors.extend(
                nested("errors")
                    .into_iter()
                    .map(RawNotice::into_validation_error),
            );
        }

        let message = raw.message.and_then(text);
        let error_summary = if ok {
            None
        } else {
            Some(
                validation_errors
                    .first()
                    .map(|error| error.message.clone())
                    .filter(|message| !message.is_empty())
                    .or_else(|| message.clone().filter(|message| !message.is_empty()))
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )
        };

        Ok(Self {
            http_status,
            status,
            ok,
            message,
            resource: raw.resource.filter(|resource| !resource.is_null()),
            warnings,
            validation_errors,
            error_summary,
            body,
        })
    }

    /// Status in the success range and no top-level errors.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// The API's own status: the body's `status` field, or the HTTP status when absent.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// The body's top-level `message`, e.g. "Successful" or "Order not found.".
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn resource(&self) -> Option<&Value> {
        self.resource.as_ref()
    }

    pub fn into_resource(self) -> Option<Value> {
        self.resource
    }

    /// `resource.items`, or an empty slice for non-collection payloads.
    pub fn items(&self) -> &[Value] {
        resource_items(self.resource.as_ref())
    }

    /// Ids of the created or listed records (`items[*].resource.id`).
    pub fn ids(&self) -> Vec<&Value> {
        self.items()
            .iter()
            .filter_map(|item| item.get("resource").and_then(|r| r.get("id")))
            .collect()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// `None` when `ok()`; otherwise a human-readable reason, never empty.
    pub fn error_summary(&self) -> Option<&str> {
        self.error_summary.as_deref()
    }

    /// The decoded body exactly as received.
    pub fn body(&self) -> &Value {
        &self.body
    }
}

fn status_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn resource_items(resource: Option<&Value>) -> &[Value] {
    resource
        .and_then(|resource| resource.get("items"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Entries of an `errors` or `warnings` field. An array is walked, a lone
/// string or object counts as one entry, and null means none.
fn notices(field: Option<Value>) -> Vec<RawNotice> {
    let entries = match field {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(single) => vec![single],
    };
    entries
        .into_iter()
        .filter(|entry| !entry.is_null())
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
