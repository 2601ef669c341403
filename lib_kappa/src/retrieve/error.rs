//! # Gateway Errors
//!
//! Failures are split structurally by where they happened (transport, HTTP
//! status, body decoding, deadline, cancellation, request construction) but
//! every variant displays as a single human-readable message. That message is
//! what the notification sink shows.

use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Flat view of a failure, suitable for UI layers and logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// Human-readable message, identical to the error's `Display` output.
    pub message: String,
    /// HTTP status of the response that caused the failure, if one arrived.
    pub source_status: Option<u16>,
    /// Decoded error body, present only for status failures.
    pub raw: Option<Value>,
}

/// Every way a gateway call can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network, DNS or connection failure before a full response was read.
    #[error("{message}")]
    Transport {
        /// Message of the underlying transport error and its causes.
        message: String,
    },

    /// The server answered with a status outside 200-299.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message taken from the body or synthesized from the status.
        message: String,
        /// Decoded error body; `{}` when the body was not JSON.
        raw: Value,
    },

    /// A success body could not be decoded into the expected shape.
    #[error("{message}")]
    Decode {
        /// JSON decoder message.
        message: String,
        /// Status of the response whose body failed to decode.
        status: Option<u16>,
    },

    /// The request deadline elapsed before a response was read.
    #[error("Request timed out after {} ms", .after.as_millis())]
    Timeout {
        /// Deadline that was applied to the call.
        after: Duration,
    },

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The request could not be built (bad URL, header name or value).
    #[error("{message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
}

impl GatewayError {
    /// HTTP status associated with the failure, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Decode { status, .. } => *status,
            _ => None,
        }
    }

    /// Flattens the error into an [`ErrorDetail`].
    pub fn detail(&self) -> ErrorDetail {
        let raw = match self {
            GatewayError::Status { raw, .. } => Some(raw.clone()),
            _ => None,
        };
        ErrorDetail {
            message: self.to_string(),
            source_status: self.status(),
            raw,
        }
    }

    /// Builds a transport error from any error, keeping its cause chain in the message.
    pub(crate) fn transport(err: &(dyn StdError + 'static)) -> Self {
        GatewayError::Transport {
            message: error_chain(err),
        }
    }

    /// Builds a status error from the status code and the (possibly empty) decoded body.
    pub(crate) fn from_status(status: u16, raw: Value) -> Self {
        GatewayError::Status {
            status,
            message: extract_error_message(status, &raw),
            raw,
        }
    }
}

/// Picks the failure message for a non-2xx response.
///
/// Precedence is the body's `detail` field, then its `message` field, then
/// `"Request failed with status <status>"`. A field counts only when it is
/// truthy: empty strings, `0`, `false` and `null` fall through. Structured
/// values (FastAPI validation errors put an array in `detail`) are rendered as
/// compact JSON.
pub fn extract_error_message(status: u16, body: &Value) -> String {
    ["detail", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(truthy_text))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Joins an error and its sources with `": "`, skipping repeated messages.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_takes_precedence_over_message() {
        let body = json!({"detail": "not found", "message": "ignored"});
        assert_eq!(extract_error_message(404, &body), "not found");
    }

    #[test]
    fn message_used_when_detail_missing() {
        let body = json!({"message": "bad password"});
        assert_eq!(extract_error_message(401, &body), "bad password");
    }

    #[test]
    fn falsy_detail_falls_through_to_message() {
        let body = json!({"detail": "", "message": "fallback"});
        assert_eq!(extract_error_message(400, &body), "fallback");

        let body = json!({"detail": null, "message": "fallback"});
        assert_eq!(extract_error_message(400, &body), "fallback");
    }

    #[test]
    fn synthesized_message_for_empty_object() {
        assert_eq!(
            extract_error_message(503, &json!({})),
            "Request failed with status 503"
        );
    }

    #[test]
    fn synthesized_message_for_non_object_body() {
        assert_eq!(
            extract_error_message(500, &json!(["oops"])),
            "Request failed with status 500"
        );
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body = json!({"detail": [{"loc": ["body", "stock"], "msg": "field required"}]});
        let message = extract_error_message(422, &body);
        assert!(message.starts_with('['));
        assert!(message.contains("field required"));
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = GatewayError::from_status(404, json!({"detail": "not found"}));
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));

        let detail = err.detail();
        assert_eq!(detail.message, "not found");
        assert_eq!(detail.source_status, Some(404));
        assert_eq!(detail.raw, Some(json!({"detail": "not found"})));
    }

    #[test]
    fn timeout_message_names_the_deadline() {
        let err = GatewayError::Timeout { after: Duration::from_millis(250) };
        assert_eq!(err.to_string(), "Request timed out after 250 ms");
        assert_eq!(err.detail().source_status, None);
    }

    #[test]
    fn error_chain_appends_causes() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        let text = error_chain(&outer);
        assert!(text.contains("connection refused"));
    }
}
