//! Middleware chain and the completion-hook interceptor.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use restguard::{Classifier, ExchangeEnvironment, Outcome, ResponseError};

use crate::errors::HttpError;
use crate::request::{Request, Response};

pub type Next = Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Response, HttpError>> + Send + Sync>;

/// Wraps a send: may inspect the request, must call `next` to forward it.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Result<Response, HttpError>;
}

/// Lifecycle entry points the interceptor always calls.
pub trait CompletionHook: Send + Sync {
    fn on_request(&self, _request: &Request) {}

    /// Runs once per fully-resolved exchange. An error replaces the response.
    fn on_complete(&self, exchange: &ExchangeEnvironment) -> Result<(), ResponseError>;
}

/// Forwards every request and hands the completed exchange to its hook.
///
/// Transport failures propagate without reaching `on_complete`.
#[derive(Clone, Debug)]
pub struct ResponseInterceptor<H> {
    hook: H,
}

impl<H: CompletionHook> ResponseInterceptor<H> {
    pub fn new(hook: H) -> Self {
        Self { hook }
    }
}

#[async_trait]
impl<H: CompletionHook> Middleware for ResponseInterceptor<H> {
    async fn handle(&self, request: Request, next: Next) -> Result<Response, HttpError> {
        self.hook.on_request(&request);
        let response = next(request).await?;
        self.hook.on_complete(&response.exchange)?;
        Ok(response)
    }
}

/// Raises classified failures as [`HttpError::Response`].
#[derive(Clone, Debug)]
pub struct RaiseError {
    classifier: Arc<Classifier>,
}

impl RaiseError {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }
}

impl Default for RaiseError {
    fn default() -> Self {
        Self::new(Arc::new(Classifier::with_defaults()))
    }
}

impl CompletionHook for RaiseError {
    fn on_complete(&self, exchange: &ExchangeEnvironment) -> Result<(), ResponseError> {
        let outcome = self.classifier.classify(exchange);
        if let Outcome::Failure(error) = &outcome {
            tracing::warn!(
                status = error.status(),
                kind = %error.kind,
                "exchange classified as failure"
            );
        } else {
            tracing::debug!(status = exchange.status, "exchange passed classification");
        }
        outcome.into_result()
    }
}

/// Hook that never fails; keeps the lifecycle calls without classification.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl CompletionHook for PassThrough {
    fn on_complete(&self, _exchange: &ExchangeEnvironment) -> Result<(), ResponseError> {
        Ok(())
    }
}
