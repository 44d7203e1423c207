use restguard::{
    Classifier, ENTITY_TOO_LARGE_MESSAGE, ErrorCodeRegistry, ErrorKind, ErrorSubkind,
    ExchangeEnvironment, Headers, MULTIPLE_MATCHES_MESSAGE, MessageFormatter, Outcome,
    ResponseError, classify,
};
use serde_json::{Value, json};

fn exchange(status: u16, body: Value) -> ExchangeEnvironment {
    let headers: Headers = [("Content-Type", "application/json"), ("Sforce-Limit-Info", "api-usage=1/100")]
        .into_iter()
        .collect();
    ExchangeEnvironment::new(status, headers, body)
}

fn failure(outcome: Outcome) -> ResponseError {
    match outcome {
        Outcome::Failure(error) => error,
        Outcome::Success => panic!("expected a classified failure"),
    }
}

#[test]
fn not_found_uses_body_message() {
    let error = failure(classify(&exchange(
        404,
        json!({"errorCode": "NOT_FOUND", "message": "missing"}),
    )));
    assert_eq!(error.kind, ErrorKind::NotFound);
    assert!(error.message.starts_with("NOT_FOUND: missing"));
    assert_eq!(error.to_string(), error.message);
}

#[test]
fn multiple_matches_keeps_context() {
    let body = json!(["/services/data/v58.0/sobjects/Account/001", "/services/data/v58.0/sobjects/Account/002"]);
    let error = failure(classify(&exchange(300, body.clone())));
    assert_eq!(error.kind, ErrorKind::MultipleMatches);
    assert_eq!(error.message, MULTIPLE_MATCHES_MESSAGE);
    assert_eq!(error.context.status, 300);
    assert_eq!(error.context.body, body);
    assert_eq!(error.context.headers.get("content-type"), Some("application/json"));
}

#[test]
fn unauthorized_appends_raw_body() {
    let body = json!({"errorCode": "INVALID_SESSION_ID", "message": "expired"});
    let error = failure(classify(&exchange(401, body)));
    assert_eq!(error.kind, ErrorKind::Unauthorized);
    assert_eq!(
        error.message,
        "INVALID_SESSION_ID: expired\nRESPONSE: {\"errorCode\":\"INVALID_SESSION_ID\",\"message\":\"expired\"}"
    );
}

#[test]
fn entity_too_large_ignores_body() {
    let error = failure(classify(&exchange(413, json!("<html>too big</html>"))));
    assert_eq!(error.kind, ErrorKind::EntityTooLarge);
    assert_eq!(error.message, ENTITY_TOO_LARGE_MESSAGE);
    assert_eq!(error.context.status, 413);
    assert_eq!(error.context.headers.get("content-type"), Some("application/json"));
    assert_eq!(error.context.headers.get("sforce-limit-info"), Some("api-usage=1/100"));
    assert_eq!(error.context.body, json!("<html>too big</html>"));
}

#[test]
fn server_error_sequence_uses_first_element() {
    let error = failure(classify(&exchange(
        500,
        json!([{"errorCode": "SERVER_ERROR", "message": "oops"}]),
    )));
    assert_eq!(error.kind, ErrorKind::Generic(None));
    assert!(error.message.starts_with("SERVER_ERROR: oops\nRESPONSE: [{"));
}

#[test]
fn registered_code_refines_generic() {
    let error = failure(classify(&exchange(
        400,
        json!([{"errorCode": "MALFORMED_QUERY", "message": "unexpected token"}]),
    )));
    assert_eq!(
        error.kind,
        ErrorKind::Generic(Some(ErrorSubkind::from_static("MalformedQuery")))
    );
}

#[test]
fn scalar_body_is_normalized() {
    let error = failure(classify(&exchange(503, json!("Service Unavailable"))));
    assert_eq!(error.kind, ErrorKind::Generic(None));
    assert_eq!(
        error.message,
        "(error code missing): Service Unavailable\nRESPONSE: \"Service Unavailable\""
    );
    assert_eq!(error.context.body, json!("Service Unavailable"));
}

#[test]
fn success_statuses_produce_no_failure() {
    for status in [200, 201, 204, 302] {
        assert_eq!(
            classify(&exchange(status, json!({"errorCode": "NOT_FOUND"}))),
            Outcome::Success
        );
    }
}

#[test]
fn sequence_and_mapping_bodies_classify_identically() {
    let single = json!({"errorCode": "DUPLICATE_VALUE", "message": "m"});
    let wrapped = json!([single.clone()]);
    for status in [400, 401, 404, 409, 500] {
        let a = failure(classify(&exchange(status, single.clone())));
        let b = failure(classify(&exchange(status, wrapped.clone())));
        assert_eq!(a.kind, b.kind, "status {status}");
        let base = |message: &str| message.split("\nRESPONSE: ").next().unwrap_or_default().to_string();
        assert_eq!(base(&a.message), base(&b.message), "status {status}");
        assert_eq!(base(&a.message), "DUPLICATE_VALUE: m");
    }
}

#[test]
fn lowercase_code_never_resolves_even_when_uppercase_registered() {
    let mut registry = ErrorCodeRegistry::new();
    registry
        .register("REQUEST_LIMIT_EXCEEDED", ErrorSubkind::new("RequestLimitExceeded"))
        .unwrap();
    let classifier = Classifier::new(registry, MessageFormatter::default());

    for code in ["request_limit_exceeded", "Request_Limit_Exceeded", "REQUEST-LIMIT-EXCEEDED", ""] {
        let error = failure(classifier.classify(&exchange(
            429,
            json!({"errorCode": code, "message": "slow down"}),
        )));
        assert_eq!(error.kind, ErrorKind::Generic(None), "code {code:?}");
    }

    let error = failure(classifier.classify(&exchange(
        429,
        json!({"errorCode": "REQUEST_LIMIT_EXCEEDED", "message": "slow down"}),
    )));
    assert_eq!(
        error.kind,
        ErrorKind::Generic(Some(ErrorSubkind::new("RequestLimitExceeded")))
    );
}

#[test]
fn non_mapping_bodies_use_missing_code() {
    for body in [json!(null), json!(42), json!(true), json!([]), json!(["first", "second"])] {
        let error = failure(classify(&exchange(502, body.clone())));
        assert!(
            error.message.starts_with("(error code missing): "),
            "body {body} produced {:?}",
            error.message
        );
    }
}

#[test]
fn overly_nested_body_keeps_base_message() {
    let deep = (0..10).fold(json!({"errorCode": "X"}), |inner, _| json!({"errorCode": "DEEP_ERROR", "message": "nested", "inner": inner}));
    let classifier = Classifier::new(ErrorCodeRegistry::with_defaults(), MessageFormatter::with_max_depth(3));
    let error = failure(classifier.classify(&exchange(500, deep)));
    assert_eq!(error.message, "DEEP_ERROR: nested");
}

#[test]
fn failure_record_serializes_with_context() {
    let error = failure(classify(&exchange(404, json!({"errorCode": "NOT_FOUND", "message": "gone"}))));
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["kind"], json!({"kind": "NotFound"}));
    assert_eq!(value["context"]["status"], json!(404));
    assert_eq!(value["context"]["headers"]["Content-Type"], json!("application/json"));
    assert_eq!(value["context"]["body"]["message"], json!("gone"));
}
