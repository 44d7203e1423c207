//! Status/body classification of a completed exchange.

use std::sync::OnceLock;

use serde_json::Value;

use crate::body::NormalizedBody;
use crate::errors::{ErrorKind, ResponseError};
use crate::exchange::ExchangeEnvironment;
use crate::format::MessageFormatter;
use crate::registry::ErrorCodeRegistry;

pub const MULTIPLE_MATCHES_MESSAGE: &str =
    "300: The external ID provided matches more than one record";
pub const ENTITY_TOO_LARGE_MESSAGE: &str = "413: Request Entity Too Large";

/// Kind and message of a failure, before the raw context is attached.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Success,
    Failure { kind: ErrorKind, message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Success,
    Failure(ResponseError),
}

impl Outcome {
    pub fn into_result(self) -> Result<(), ResponseError> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(error) => Err(error),
        }
    }
}

/// Immutable classification policy; share freely across pipelines.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    registry: ErrorCodeRegistry,
    formatter: MessageFormatter,
}

impl Classifier {
    pub fn new(registry: ErrorCodeRegistry, formatter: MessageFormatter) -> Self {
        Self {
            registry,
            formatter,
        }
    }

    /// Default registry codes with the default formatter.
    pub fn with_defaults() -> Self {
        Self::new(ErrorCodeRegistry::with_defaults(), MessageFormatter::default())
    }

    pub fn registry(&self) -> &ErrorCodeRegistry {
        &self.registry
    }

    /// Decision table over `(status, body)`. First matching row wins.
    pub fn verdict(&self, status: u16, body: &Value) -> Verdict {
        let (kind, message) = match status {
            300 => (ErrorKind::MultipleMatches, MULTIPLE_MATCHES_MESSAGE.to_string()),
            401 => (ErrorKind::Unauthorized, self.message(body)),
            404 => (ErrorKind::NotFound, self.message(body)),
            413 => (ErrorKind::EntityTooLarge, ENTITY_TOO_LARGE_MESSAGE.to_string()),
            400..=599 => {
                let normalized = NormalizedBody::from_body(body);
                let kind = self.registry.resolve(normalized.error_code_str());
                (kind, self.formatter.format(&normalized, body))
            }
            _ => return Verdict::Success,
        };
        Verdict::Failure { kind, message }
    }

    /// Classifies `exchange`, attaching its raw values to any failure.
    pub fn classify(&self, exchange: &ExchangeEnvironment) -> Outcome {
        match self.verdict(exchange.status, &exchange.body) {
            Verdict::Success => Outcome::Success,
            Verdict::Failure { kind, message } => {
                Outcome::Failure(ResponseError::new(kind, message, exchange.context()))
            }
        }
    }

    fn message(&self, body: &Value) -> String {
        self.formatter.format(&NormalizedBody::from_body(body), body)
    }
}

static DEFAULT_CLASSIFIER: OnceLock<Classifier> = OnceLock::new();

pub fn default_classifier() -> &'static Classifier {
    DEFAULT_CLASSIFIER.get_or_init(Classifier::with_defaults)
}

/// Classifies with [`default_classifier`].
pub fn classify(exchange: &ExchangeEnvironment) -> Outcome {
    default_classifier().classify(exchange)
}
