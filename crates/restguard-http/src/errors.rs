use restguard::ResponseError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error type for requests sent through the pipeline.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The exchange completed and was classified as a failure.
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl HttpError {
    pub fn as_response_error(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(error) => Some(error),
            _ => None,
        }
    }
}
