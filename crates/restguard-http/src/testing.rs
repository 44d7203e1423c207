use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use restguard::ExchangeEnvironment;

use crate::errors::HttpError;
use crate::request::{Request, Response};
use crate::transport::Transport;

/// In-memory transport replaying queued exchanges in order.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportState>>,
}

#[derive(Debug, Default)]
struct MockTransportState {
    queued: VecDeque<Result<ExchangeEnvironment, String>>,
    requests: Vec<Request>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_exchange(&self, exchange: ExchangeEnvironment) {
        self.state().queued.push_back(Ok(exchange));
    }

    /// Queue a connection-level failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.state().queued.push_back(Err(message.into()));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockTransportState> {
        self.inner.lock().expect("mock transport mutex")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        let url = request.path.clone();
        let next = {
            let mut state = self.state();
            state.requests.push(request);
            state.queued.pop_front()
        };
        match next {
            Some(Ok(exchange)) => Ok(Response::new(url, exchange)),
            Some(Err(message)) => Err(HttpError::Transport(message)),
            None => Err(HttpError::Transport(format!("no exchange queued for {url}"))),
        }
    }
}
