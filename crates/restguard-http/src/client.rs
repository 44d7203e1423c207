//! Client and middleware pipeline.

use std::sync::Arc;

use restguard::{Classifier, ErrorCodeRegistry, MessageFormatter};

use crate::config::ClientConfig;
use crate::errors::HttpError;
use crate::middleware::{Middleware, Next, RaiseError, ResponseInterceptor};
use crate::request::{Request, Response};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>, middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            transport,
            middleware,
        }
    }

    /// Reqwest transport, plus the error-raising interceptor unless
    /// `raise_errors` is off.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let transport = ReqwestTransport::from_config(config)?;
        let mut client = Self::new(Arc::new(transport), Vec::new());
        if config.raise_errors {
            let classifier = Classifier::new(
                ErrorCodeRegistry::with_defaults(),
                MessageFormatter::with_max_depth(config.max_body_depth),
            );
            client.add_middleware(Arc::new(ResponseInterceptor::new(RaiseError::new(
                Arc::new(classifier),
            ))));
        }
        Ok(client)
    }

    pub fn from_env() -> Result<Self, HttpError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Middleware registered first runs outermost.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub async fn send(&self, request: Request) -> Result<Response, HttpError> {
        let transport = self.transport.clone();
        let base: Next = Arc::new(move |req| {
            let transport = transport.clone();
            Box::pin(async move { transport.send(req).await })
        });

        let handler = self
            .middleware
            .iter()
            .rev()
            .fold(base, |next, middleware| {
                let middleware = middleware.clone();
                Arc::new(move |req| {
                    let middleware = middleware.clone();
                    let next = next.clone();
                    Box::pin(async move { middleware.handle(req, next).await })
                })
            });

        handler(request).await
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<Response, HttpError> {
        self.send(Request::get(path)).await
    }
}
