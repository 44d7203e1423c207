//! Validated API error codes mapped to generic-failure subkinds.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{ErrorKind, ErrorSubkind, RegistryError};

/// Codes the remote API documents for its error payloads.
pub const DEFAULT_ERROR_CODES: &[&str] = &[
    "ALL_OR_NONE_OPERATION_ROLLED_BACK",
    "ALREADY_IN_PROCESS",
    "API_CURRENTLY_DISABLED",
    "API_DISABLED_FOR_ORG",
    "CANNOT_CASCADE_PRODUCT_ACTIVE",
    "CANNOT_DELETE_MANAGED_OBJECT",
    "CANNOT_INSERT_UPDATE_ACTIVATE_ENTITY",
    "CANNOT_MODIFY_MANAGED_OBJECT",
    "CANNOT_REPARENT_RECORD",
    "CANNOT_UPDATE_CONVERTED_LEAD",
    "CIRCULAR_DEPENDENCY",
    "DELETE_FAILED",
    "DEPENDENCY_EXISTS",
    "DUPLICATES_DETECTED",
    "DUPLICATE_EXTERNAL_ID",
    "DUPLICATE_USERNAME",
    "DUPLICATE_VALUE",
    "EMAIL_ADDRESS_BOUNCED",
    "EMAIL_OPTED_OUT",
    "ENTITY_IS_ARCHIVED",
    "ENTITY_IS_DELETED",
    "ENTITY_IS_LOCKED",
    "EXCEEDED_MAX_SEMIJOIN_SUBSELECTS",
    "FIELD_CUSTOM_VALIDATION_EXCEPTION",
    "FIELD_FILTER_VALIDATION_EXCEPTION",
    "FIELD_INTEGRITY_EXCEPTION",
    "INACTIVE_OWNER_OR_USER",
    "INSUFFICIENT_ACCESS_ON_CROSS_REFERENCE_ENTITY",
    "INSUFFICIENT_ACCESS_OR_READONLY",
    "INVALID_ARGUMENT_TYPE",
    "INVALID_AUTH_HEADER",
    "INVALID_BATCH_OPERATION",
    "INVALID_CONTENT_TYPE",
    "INVALID_CROSS_REFERENCE_KEY",
    "INVALID_EMAIL_ADDRESS",
    "INVALID_FIELD",
    "INVALID_FIELD_FOR_INSERT_UPDATE",
    "INVALID_ID_FIELD",
    "INVALID_OPERATION",
    "INVALID_OPERATOR",
    "INVALID_OR_NULL_FOR_RESTRICTED_PICKLIST",
    "INVALID_QUERY_FILTER_OPERATOR",
    "INVALID_QUERY_LOCATOR",
    "INVALID_READ_ONLY_USER_DML",
    "INVALID_SESSION_ID",
    "INVALID_STATUS",
    "INVALID_TYPE",
    "INVALID_TYPE_FOR_OPERATION",
    "INVALID_TYPE_ON_FIELD_IN_RECORD",
    "JSON_PARSER_ERROR",
    "LICENSE_LIMIT_EXCEEDED",
    "LIMIT_EXCEEDED",
    "LOGIN_MUST_USE_SECURITY_TOKEN",
    "MALFORMED_ID",
    "MALFORMED_QUERY",
    "MAXIMUM_SIZE_OF_ATTACHMENT",
    "MAXIMUM_SIZE_OF_DOCUMENT",
    "MERGE_FAILED",
    "METHOD_NOT_ALLOWED",
    "MISSING_ARGUMENT",
    "NOT_FOUND",
    "NUMBER_OUTSIDE_VALID_RANGE",
    "PACKAGE_LICENSE_REQUIRED",
    "PLATFORM_EVENT_PUBLISH_FAILED",
    "QUERY_TIMEOUT",
    "REQUEST_LIMIT_EXCEEDED",
    "REQUEST_RUNNING_TOO_LONG",
    "REQUIRED_FIELD_MISSING",
    "SELF_REFERENCE_FROM_TRIGGER",
    "SERVER_UNAVAILABLE",
    "STORAGE_LIMIT_EXCEEDED",
    "STRING_TOO_LONG",
    "TOO_MANY_APEX_REQUESTS",
    "TOO_MANY_ENUM_VALUE",
    "UNABLE_TO_LOCK_ROW",
    "UNAVAILABLE_RECORDTYPE_EXCEPTION",
    "UNDELETE_FAILED",
    "UNKNOWN_EXCEPTION",
];

static ERROR_CODE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Full-string match against `^[A-Z_]+$`.
pub fn is_valid_error_code(code: &str) -> bool {
    ERROR_CODE_PATTERN
        .get_or_init(|| Regex::new(r"\A[A-Z_]+\z").expect("error code pattern"))
        .is_match(code)
}

/// Static mapping from error codes to subkinds of [`ErrorKind::Generic`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorCodeRegistry {
    entries: BTreeMap<String, ErrorSubkind>,
}

impl ErrorCodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with [`DEFAULT_ERROR_CODES`], each mapped to its
    /// CamelCase subkind.
    pub fn with_defaults() -> Self {
        Self {
            entries: DEFAULT_ERROR_CODES
                .iter()
                .map(|code| ((*code).to_string(), ErrorSubkind::from_code(code)))
                .collect(),
        }
    }

    /// Returns the subkind previously registered for `code`, if any.
    pub fn register(
        &mut self,
        code: impl Into<String>,
        subkind: ErrorSubkind,
    ) -> Result<Option<ErrorSubkind>, RegistryError> {
        let code = code.into();
        if !is_valid_error_code(&code) {
            return Err(RegistryError::InvalidCode(code));
        }
        Ok(self.entries.insert(code, subkind))
    }

    pub fn get(&self, code: &str) -> Option<&ErrorSubkind> {
        self.entries.get(code)
    }

    /// Kind for a generic 4xx/5xx failure. Codes failing the pattern never
    /// consult the table; valid codes without an entry stay unrefined.
    pub fn resolve(&self, code: Option<&str>) -> ErrorKind {
        let subkind = code
            .filter(|code| is_valid_error_code(code))
            .and_then(|code| self.entries.get(code))
            .cloned();
        ErrorKind::Generic(subkind)
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = (&str, &ErrorSubkind)> {
        self.entries
            .iter()
            .map(|(code, subkind)| (code.as_str(), subkind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
