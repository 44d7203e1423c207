//! Reduces a decoded response body to its `{errorCode, message}` shape.

use serde_json::Value;

pub const MISSING_ERROR_CODE: &str = "(error code missing)";

/// The two fields classification and formatting read from a body.
///
/// Borrowed from the raw body; never stored past one classification call.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedBody<'a> {
    error_code: Field<'a>,
    message: Field<'a>,
}

#[derive(Clone, Debug, PartialEq)]
enum Field<'a> {
    Missing,
    Static(&'static str),
    Value(&'a Value),
}

impl<'a> NormalizedBody<'a> {
    /// Sequences reduce to their first element; anything that is not then a
    /// mapping becomes the message under a synthesized error code.
    pub fn from_body(body: &'a Value) -> Self {
        let candidate = match body {
            Value::Array(items) => items.first(),
            other => Some(other),
        };

        match candidate {
            Some(Value::Object(map)) => Self {
                error_code: map.get("errorCode").map_or(Field::Missing, Field::Value),
                message: map.get("message").map_or(Field::Missing, Field::Value),
            },
            Some(scalar) => Self {
                error_code: Field::Static(MISSING_ERROR_CODE),
                message: Field::Value(scalar),
            },
            None => Self {
                error_code: Field::Static(MISSING_ERROR_CODE),
                message: Field::Missing,
            },
        }
    }

    /// The error code only when the body carried it as a string.
    pub fn error_code_str(&self) -> Option<&str> {
        match &self.error_code {
            Field::Static(text) => Some(*text),
            Field::Value(Value::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn error_code(&self) -> String {
        self.error_code.render()
    }

    pub fn message(&self) -> String {
        self.message.render()
    }
}

impl Field<'_> {
    fn render(&self) -> String {
        match self {
            Field::Missing | Field::Value(Value::Null) => String::new(),
            Field::Static(text) => (*text).to_string(),
            Field::Value(Value::String(text)) => text.clone(),
            Field::Value(other) => other.to_string(),
        }
    }
}
