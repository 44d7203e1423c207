use std::str::FromStr;

use restguard::DEFAULT_MAX_BODY_DEPTH;

use crate::errors::ConfigurationError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings for a [`crate::Client`] and its reqwest transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Install the error-raising interceptor.
    pub raise_errors: bool,
    /// Bodies nested deeper than this are left out of failure messages.
    pub max_body_depth: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
            raise_errors: true,
            max_body_depth: DEFAULT_MAX_BODY_DEPTH,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `RESTGUARD_*` variables. Blank values are ignored.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = read("RESTGUARD_BASE_URL") {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(value) = read("RESTGUARD_TIMEOUT_MS") {
            config.timeout_ms = parse_number("RESTGUARD_TIMEOUT_MS", &value)?;
        }
        if let Some(user_agent) = read("RESTGUARD_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(value) = read("RESTGUARD_RAISE_ERRORS") {
            config.raise_errors = parse_flag("RESTGUARD_RAISE_ERRORS", &value)?;
        }
        if let Some(value) = read("RESTGUARD_MAX_BODY_DEPTH") {
            config.max_body_depth = parse_number("RESTGUARD_MAX_BODY_DEPTH", &value)?;
        }

        Ok(config)
    }
}

pub fn default_user_agent() -> String {
    format!("restguard/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigurationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::new(format!("{name} must be a non-negative integer, got {value:?}")))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigurationError::new(format!(
            "{name} must be a boolean, got {value:?}"
        ))),
    }
}
