//! Request pipeline that raises classified failures for completed exchanges.
//!
//! A [`Client`] folds its [`Middleware`] list around a [`Transport`]. The
//! [`ResponseInterceptor`] calls its [`CompletionHook`] once per completed
//! exchange; with [`RaiseError`] installed a failing exchange surfaces as
//! [`HttpError::Response`] instead of a [`Response`].

pub mod client;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod request;
pub mod testing;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use errors::{ConfigurationError, HttpError};
pub use middleware::{
    CompletionHook, Middleware, Next, PassThrough, RaiseError, ResponseInterceptor,
};
pub use request::{Request, Response};
pub use testing::MockTransport;
pub use transport::{ReqwestTransport, Transport, decode_body};

pub use reqwest;
pub use restguard;
