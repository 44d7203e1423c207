use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use restguard::{
    ENTITY_TOO_LARGE_MESSAGE, ErrorKind, ExchangeEnvironment, Headers, MULTIPLE_MATCHES_MESSAGE,
    ResponseError,
};
use restguard_http::{
    Client, CompletionHook, HttpError, MockTransport, RaiseError, Request, ResponseInterceptor,
};
use serde_json::{Value, json};

fn exchange(status: u16, body: Value) -> ExchangeEnvironment {
    let headers: Headers = [("Content-Type", "application/json")].into_iter().collect();
    ExchangeEnvironment::new(status, headers, body)
}

fn raising_client(transport: MockTransport) -> Client {
    Client::new(
        Arc::new(transport),
        vec![Arc::new(ResponseInterceptor::new(RaiseError::default()))],
    )
}

fn response_error(result: Result<restguard_http::Response, HttpError>) -> ResponseError {
    match result {
        Err(HttpError::Response(error)) => error,
        other => panic!("expected classified failure, got {other:?}"),
    }
}

#[derive(Clone, Default)]
struct CountingHook {
    requests: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

impl CompletionHook for CountingHook {
    fn on_request(&self, _request: &Request) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn on_complete(&self, _exchange: &ExchangeEnvironment) -> Result<(), ResponseError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(flavor = "current_thread")]
async fn success_returns_response_unchanged() {
    let transport = MockTransport::new();
    let original = exchange(200, json!({"id": "001", "Name": "Acme"}));
    transport.push_exchange(original.clone());

    let response = raising_client(transport.clone())
        .get("/sobjects/Account/001")
        .await
        .unwrap();
    assert_eq!(response.exchange, original);
    assert_eq!(response.url, "/sobjects/Account/001");
}

#[tokio::test(flavor = "current_thread")]
async fn failure_supersedes_response() {
    let transport = MockTransport::new();
    transport.push_exchange(exchange(
        404,
        json!([{"errorCode": "NOT_FOUND", "message": "The requested resource does not exist"}]),
    ));

    let error = response_error(raising_client(transport).get("/sobjects/Account/missing").await);
    assert_eq!(error.kind, ErrorKind::NotFound);
    assert!(
        error
            .message
            .starts_with("NOT_FOUND: The requested resource does not exist\nRESPONSE: ")
    );
    assert_eq!(error.context.headers.get("content-type"), Some("application/json"));
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_status_messages_flow_through_pipeline() {
    let transport = MockTransport::new();
    transport.push_exchange(exchange(300, json!(["/a", "/b"])));
    transport.push_exchange(exchange(413, Value::Null));
    let client = raising_client(transport);

    let error = response_error(client.get("/upsert").await);
    assert_eq!(error.kind, ErrorKind::MultipleMatches);
    assert_eq!(error.message, MULTIPLE_MATCHES_MESSAGE);
    assert_eq!(error.context.status, 300);

    let error = response_error(client.get("/upload").await);
    assert_eq!(error.kind, ErrorKind::EntityTooLarge);
    assert_eq!(error.message, ENTITY_TOO_LARGE_MESSAGE);
    assert_eq!(error.context.status, 413);
    assert_eq!(error.context.headers.get("content-type"), Some("application/json"));
    assert_eq!(error.context.body, Value::Null);
}

#[tokio::test(flavor = "current_thread")]
async fn hook_runs_once_per_exchange() {
    let hook = CountingHook::default();
    let transport = MockTransport::new();
    transport.push_exchange(exchange(200, json!({})));
    transport.push_exchange(exchange(500, json!("boom")));
    let client = Client::new(
        Arc::new(transport),
        vec![Arc::new(ResponseInterceptor::new(hook.clone()))],
    );

    client.get("/one").await.unwrap();
    client.get("/two").await.unwrap();
    assert_eq!(hook.requests.load(Ordering::SeqCst), 2);
    assert_eq!(hook.completions.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn transport_failure_skips_completion() {
    let hook = CountingHook::default();
    let transport = MockTransport::new();
    transport.push_failure("connection refused");
    let client = Client::new(
        Arc::new(transport),
        vec![Arc::new(ResponseInterceptor::new(hook.clone()))],
    );

    let error = client.get("/down").await.unwrap_err();
    assert!(matches!(error, HttpError::Transport(ref message) if message == "connection refused"));
    assert_eq!(hook.requests.load(Ordering::SeqCst), 1);
    assert_eq!(hook.completions.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn interceptor_does_not_mutate_request() {
    let transport = MockTransport::new();
    transport.push_exchange(exchange(201, json!({"id": "001", "success": true})));
    let request = Request::post("/sobjects/Account", json!({"Name": "Acme"}))
        .with_header("Authorization", "Bearer token");

    raising_client(transport.clone())
        .send(request.clone())
        .await
        .unwrap();
    assert_eq!(transport.requests(), vec![request]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_pipelines_keep_their_own_context() {
    let shared = RaiseError::default();
    let mut tasks = Vec::new();
    for status in 400u16..480 {
        let hook = shared.clone();
        tasks.push(tokio::spawn(async move {
            let transport = MockTransport::new();
            transport.push_exchange(exchange(
                status,
                json!({"errorCode": "UNKNOWN_EXCEPTION", "message": format!("status {status}")}),
            ));
            let client = Client::new(
                Arc::new(transport),
                vec![Arc::new(ResponseInterceptor::new(hook))],
            );
            (status, client.get(format!("/r/{status}")).await)
        }));
    }

    for task in tasks {
        let (status, result) = task.await.unwrap();
        match result {
            Ok(_) => panic!("status {status} should fail"),
            Err(HttpError::Response(error)) => {
                assert_eq!(error.context.status, status);
                assert_eq!(error.context.body["message"], json!(format!("status {status}")));
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}
