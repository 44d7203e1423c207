//! Error taxonomy surfaced to callers of an intercepted request.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exchange::ErrorContext;

/// Refinement of a generic 4xx/5xx failure, resolved from the API error code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSubkind(Cow<'static, str>);

impl ErrorSubkind {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// `INVALID_SESSION_ID` becomes `InvalidSessionId`.
    pub fn from_code(code: &str) -> Self {
        let mut name = String::with_capacity(code.len());
        for word in code.split('_').filter(|word| !word.is_empty()) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                name.push(first.to_ascii_uppercase());
                name.extend(chars.map(|c| c.to_ascii_lowercase()));
            }
        }
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorSubkind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural failure categories. `Generic` optionally carries a subkind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "subkind")]
pub enum ErrorKind {
    MultipleMatches,
    Unauthorized,
    NotFound,
    EntityTooLarge,
    Generic(Option<ErrorSubkind>),
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MultipleMatches => "MultipleMatches",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "NotFound",
            Self::EntityTooLarge => "EntityTooLarge",
            Self::Generic(_) => "Generic",
        }
    }

    pub fn subkind(&self) -> Option<&ErrorSubkind> {
        match self {
            Self::Generic(subkind) => subkind.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subkind() {
            Some(subkind) => write!(f, "{}({subkind})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

/// A classified failure: kind, human-readable message, raw exchange.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ResponseError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

impl ResponseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            kind,
            message: message.into(),
            context,
        }
    }

    pub fn status(&self) -> u16 {
        self.context.status
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("error code {0:?} does not match ^[A-Z_]+$ and can never be resolved")]
    InvalidCode(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("body nests deeper than {max_depth} levels")]
    DepthExceeded { max_depth: usize },
    #[error("body serialization failed: {0}")]
    Encode(String),
}
