use reqwest::Method;
use restguard::{ExchangeEnvironment, Headers};
use serde::Serialize;
use serde_json::Value;

/// Outgoing request handed down the middleware chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL, or a path joined onto the transport's base URL.
    pub path: String,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully-resolved response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub url: String,
    pub exchange: ExchangeEnvironment,
}

impl Response {
    pub fn new(url: impl Into<String>, exchange: ExchangeEnvironment) -> Self {
        Self {
            url: url.into(),
            exchange,
        }
    }

    pub fn status(&self) -> u16 {
        self.exchange.status
    }

    pub fn headers(&self) -> &Headers {
        &self.exchange.headers
    }

    pub fn body(&self) -> &Value {
        &self.exchange.body
    }
}
