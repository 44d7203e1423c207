//! Classification of completed HTTP exchanges into a typed error taxonomy.
//!
//! A [`Classifier`] reads the status code and decoded body of an
//! [`ExchangeEnvironment`] and returns an [`Outcome`]. Failures carry an
//! [`ErrorKind`], a diagnostic message and the raw [`ErrorContext`].

pub mod body;
pub mod classify;
pub mod errors;
pub mod exchange;
pub mod format;
pub mod registry;

pub use body::{MISSING_ERROR_CODE, NormalizedBody};
pub use classify::{
    Classifier, ENTITY_TOO_LARGE_MESSAGE, MULTIPLE_MATCHES_MESSAGE, Outcome, Verdict, classify,
    default_classifier,
};
pub use errors::{ErrorKind, ErrorSubkind, RegistryError, ResponseError, SerializeError};
pub use exchange::{ErrorContext, ExchangeEnvironment, Headers};
pub use format::{
    BodySerializer, DEFAULT_MAX_BODY_DEPTH, JsonBodySerializer, MessageFormatter,
    RESPONSE_SEPARATOR,
};
pub use registry::{DEFAULT_ERROR_CODES, ErrorCodeRegistry, is_valid_error_code};
