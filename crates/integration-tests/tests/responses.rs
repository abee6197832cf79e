mod harness;

use harness::app;
use harness::server::TestServer;
use httperr_axum::ResponseConfig;
use serde_json::{Value, json};

fn verbose() -> ResponseConfig {
    ResponseConfig::from_toml_str("expose_params = true\nexpose_trace = true").unwrap()
}

#[tokio::test]
async fn success_passes_through() {
    let server = TestServer::start(app::router(ResponseConfig::default())).await.unwrap();

    let resp = server.client().get(server.url("/users/1")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "profile of alice");
}

#[tokio::test]
async fn bump_keeps_not_found_status() {
    let server = TestServer::start(app::router(verbose())).await.unwrap();

    let resp = server.client().get(server.url("/users/7")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "E_PROFILE_UNAVAILABLE");
    assert_eq!(body["error"]["params"], json!([7]));

    let trace = body["error"]["trace"].as_str().unwrap();
    let original = trace.find("HttpError[404]: E_USER_NOT_FOUND (7)").unwrap();
    let bumped = trace.find("HttpError[404]: E_PROFILE_UNAVAILABLE (7)").unwrap();
    assert!(original < bumped);
}

#[tokio::test]
async fn wrapped_io_errors_keep_their_history() {
    let server = TestServer::start(app::router(verbose())).await.unwrap();

    let resp = server.client().get(server.url("/users/2")).send().await.unwrap();

    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "E_PROFILE_UNAVAILABLE");
    assert_eq!(body["error"]["params"], json!(["connection reset"]));

    let trace = body["error"]["trace"].as_str().unwrap();
    assert!(trace.contains("Error: connection reset"));
    assert!(trace.contains("HttpError[503]: E_STORE_UNAVAILABLE (connection reset)"));
    assert!(trace.contains("HttpError[503]: E_PROFILE_UNAVAILABLE (connection reset)"));
}

#[tokio::test]
async fn parse_failures_become_bad_requests() {
    let server = TestServer::start(app::router(verbose())).await.unwrap();

    let resp = server.client().get(server.url("/users/abc")).send().await.unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "E_BAD_USER_ID");
    assert_eq!(body["error"]["params"], json!(["invalid digit found in string"]));
    assert!(
        body["error"]["trace"]
            .as_str()
            .unwrap()
            .starts_with("ParseIntError: invalid digit found in string")
    );
}

#[tokio::test]
async fn legacy_errors_are_adopted_with_their_headers() {
    let server = TestServer::start(app::router(verbose())).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/tenants/acme/quota"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 429);
    assert_eq!(
        resp.headers().get("retry-after").and_then(|v| v.to_str().ok()),
        Some("60")
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "E_QUOTA_EXCEEDED");
    assert_eq!(body["error"]["params"], json!(["acme"]));
    assert_eq!(body["error"]["trace"], "LegacyHttpError[429]: E_QUOTA_EXCEEDED");
}

#[tokio::test]
async fn unexpected_errors_hide_details_by_default() {
    let server = TestServer::start(app::router(ResponseConfig::default())).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/import"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": { "code": "E_UNEXPECTED", "status": 500 } }));
}

#[tokio::test]
async fn unexpected_errors_carry_the_message_as_a_param() {
    let server = TestServer::start(app::router(verbose())).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/import"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    let params = body["error"]["params"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert!(params[0].as_str().unwrap().contains("key must be a string"));
}
