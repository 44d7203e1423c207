//! Diagnostic messages for classified failures.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::body::NormalizedBody;
use crate::errors::SerializeError;

pub const RESPONSE_SEPARATOR: &str = "\nRESPONSE: ";
pub const DEFAULT_MAX_BODY_DEPTH: usize = 128;

/// Renders the raw body appended to a failure message.
pub trait BodySerializer: Send + Sync {
    fn serialize(&self, body: &Value) -> Result<String, SerializeError>;
}

/// Compact JSON, refusing bodies nested deeper than `max_depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonBodySerializer {
    pub max_depth: usize,
}

impl Default for JsonBodySerializer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_BODY_DEPTH,
        }
    }
}

impl BodySerializer for JsonBodySerializer {
    fn serialize(&self, body: &Value) -> Result<String, SerializeError> {
        if nesting_depth(body) > self.max_depth {
            return Err(SerializeError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        serde_json::to_string(body).map_err(|error| SerializeError::Encode(error.to_string()))
    }
}

/// Scalars are depth 0; each enclosing array or object adds one.
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&Value, usize)> = vec![(value, 0)];
    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Array(items) => {
                deepest = deepest.max(depth + 1);
                pending.extend(items.iter().map(|child| (child, depth + 1)));
            }
            Value::Object(map) => {
                deepest = deepest.max(depth + 1);
                pending.extend(map.values().map(|child| (child, depth + 1)));
            }
            _ => {}
        }
    }
    deepest
}

#[derive(Clone)]
pub struct MessageFormatter {
    serializer: Arc<dyn BodySerializer>,
}

impl MessageFormatter {
    pub fn new(serializer: Arc<dyn BodySerializer>) -> Self {
        Self { serializer }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(Arc::new(JsonBodySerializer { max_depth }))
    }

    /// `"{errorCode}: {message}"` plus the raw body when it serializes.
    /// Never fails: a serialization error leaves just the base message.
    pub fn format(&self, normalized: &NormalizedBody<'_>, raw_body: &Value) -> String {
        let mut message = format!("{}: {}", normalized.error_code(), normalized.message());
        match self.serializer.serialize(raw_body) {
            Ok(rendered) => {
                message.push_str(RESPONSE_SEPARATOR);
                message.push_str(&rendered);
            }
            Err(error) => {
                tracing::debug!(%error, "omitting response body from error message");
            }
        }
        message
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(Arc::new(JsonBodySerializer::default()))
    }
}

impl fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFormatter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSerializer;

    impl BodySerializer for FailingSerializer {
        fn serialize(&self, _body: &Value) -> Result<String, SerializeError> {
            Err(SerializeError::Encode("unsupported value".to_string()))
        }
    }

    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!("leaf"), |inner, _| json!([inner]))
    }

    #[test]
    fn appends_compact_raw_body() {
        let body = json!([{"errorCode": "INVALID_FIELD", "message": "bad field"}]);
        let message = MessageFormatter::default().format(&NormalizedBody::from_body(&body), &body);
        assert_eq!(
            message,
            "INVALID_FIELD: bad field\nRESPONSE: [{\"errorCode\":\"INVALID_FIELD\",\"message\":\"bad field\"}]"
        );
    }

    #[test]
    fn serializer_failure_returns_base_message() {
        let body = json!({"errorCode": "INVALID_FIELD", "message": "bad field"});
        let formatter = MessageFormatter::new(Arc::new(FailingSerializer));
        let message = formatter.format(&NormalizedBody::from_body(&body), &body);
        assert_eq!(message, "INVALID_FIELD: bad field");
    }

    #[test]
    fn depth_limit_degrades_to_base_message() {
        let body = nested(5);
        let formatter = MessageFormatter::with_max_depth(4);
        let message = formatter.format(&NormalizedBody::from_body(&body), &body);
        assert_eq!(message, "(error code missing): [[[[\"leaf\"]]]]");
        assert!(!message.contains("RESPONSE:"));
    }

    #[test]
    fn depth_counts_containers_only() {
        assert_eq!(nesting_depth(&json!("scalar")), 0);
        assert_eq!(nesting_depth(&json!({"a": [1, 2]})), 2);
        assert_eq!(nesting_depth(&nested(4)), 4);
        assert!(JsonBodySerializer { max_depth: 4 }.serialize(&nested(4)).is_ok());
    }
}
