use std::time::Duration;

use nanobanana::{
    ApiClient, ApiConfig, ClientError, ErrorCode, GenerationRequest, MaskStroke, PollStatus,
    PollStatusRequest, StrokeMode,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE: &str = "/api/image-editing/v1/generate";
const RESULT: &str = "/api/image-editing/v1/result";

fn client_for(server: &MockServer) -> ApiClient {
    // Trailing slash on purpose: it must be stripped before joining paths.
    ApiClient::new(ApiConfig::new(format!("{}/", server.uri())).with_api_key("test-token"))
}

async fn reply(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn generate_sends_exact_body_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE))
        .and(header("authorization", "test-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "data": {
                "prompt": "make the sky purple",
                "inputImage": ["aW1hZ2U="],
                "numOfImages": 1,
                "model": "NANO BANANA"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requestId": "req-abc-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate_image(&GenerationRequest::from_image_bytes(b"image").with_prompt("make the sky purple"))
        .await;

    assert!(response.is_success());
    let result = response.result().unwrap();
    assert_eq!(result.request_id.as_deref(), Some("req-abc-123"));
    assert_eq!(
        result.metadata.as_ref().and_then(|m| m.model.as_deref()),
        Some("NANO BANANA")
    );
}

#[tokio::test]
async fn generate_with_mask_sets_mask_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE))
        .and(body_partial_json(json!({
            "data": {
                "maskMode": true,
                "maskStrokes": [{
                    "points": [{"x": 10.0, "y": 20.0}],
                    "brushSize": 30.0,
                    "mode": "erase"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requestId": "masked-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("aW1n")
        .with_mask(vec![MaskStroke::new(30.0).with_mode(StrokeMode::Erase).point(10.0, 20.0)]);
    let response = client_for(&server).generate_image(&request).await;

    assert_eq!(response.request_id(), Some("masked-1"));
}

#[tokio::test]
async fn generate_server_error_becomes_failure() {
    let server = MockServer::start().await;
    reply(&server, GENERATE, 500, json!({"error": "internal"})).await;

    let response = client_for(&server)
        .generate_image(&GenerationRequest::new("aW1n"))
        .await;

    assert!(!response.is_success());
    let error = response.error().unwrap();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(error.message.contains("500"), "message was {}", error.message);
    assert!(matches!(error.details(), Some(ClientError::Http { status: 500, .. })));
}

#[tokio::test]
async fn generate_rejected_by_backend_uses_body_message() {
    let server = MockServer::start().await;
    reply(
        &server,
        GENERATE,
        200,
        json!({"success": false, "error": {"message": "Insufficient credits"}}),
    )
    .await;

    let error = client_for(&server)
        .generate_image(&GenerationRequest::new("aW1n"))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert_eq!(error.message, "Insufficient credits");
}

#[tokio::test]
async fn unreachable_backend_never_escapes() {
    // Grab a free port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = ApiClient::new(ApiConfig::new(format!("http://{}", addr)));

    let generated = api.generate_image(&GenerationRequest::new("aW1n")).await;
    let error = generated.error().unwrap();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(matches!(error.details(), Some(ClientError::Network(_))));

    let polled = api.poll_status(&PollStatusRequest::new("gone")).await;
    assert_eq!(polled.status(), PollStatus::Failed);
    let error = polled.error().unwrap();
    assert_eq!(error.code, ErrorCode::PollingFailed);
    assert!(matches!(error.details(), Some(ClientError::Network(_))));
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "requestId": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(ApiConfig::new(server.uri()).with_timeout(Duration::from_millis(100)));
    let response = api.generate_image(&GenerationRequest::new("aW1n")).await;

    let error = response.error().unwrap();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(error.details().map_or(false, |d| d.is_timeout()));
}

#[tokio::test]
async fn poll_completed_echoes_requested_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESULT))
        .and(body_json(json!({"data": {"requestId": "req-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requestId": "something-else",
            "result": {
                "status": "COMPLETED",
                "output": "https://cdn.test/out.png",
                "processingTime": 12.5
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client_for(&server)
        .poll_status(&PollStatusRequest::new("req-1"))
        .await;

    assert_eq!(status.status(), PollStatus::Completed);
    let result = status.result().unwrap();
    assert_eq!(result.request_id.as_deref(), Some("req-1"));
    assert_eq!(result.output.as_deref(), Some("https://cdn.test/out.png"));
    assert_eq!(result.metadata.as_ref().unwrap().processing_time, Some(12.5));
}

#[tokio::test]
async fn poll_failed_and_processing_states() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESULT))
        .and(body_partial_json(json!({"data": {"requestId": "bad"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"status": "FAILED", "errorMessage": "boom"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RESULT))
        .and(body_partial_json(json!({"data": {"requestId": "busy"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"status": "IN_PROGRESS", "progress": 42}
        })))
        .mount(&server)
        .await;

    let api = client_for(&server);

    let failed = api.poll_status(&PollStatusRequest::new("bad")).await;
    assert_eq!(failed.status(), PollStatus::Failed);
    assert_eq!(failed.error().unwrap().message, "boom");

    let busy = api.poll_status(&PollStatusRequest::new("busy")).await;
    assert_eq!(busy.status(), PollStatus::Processing);
    assert_eq!(busy.progress(), Some(42.0));
}

#[tokio::test]
async fn poll_http_error_uses_polling_code() {
    let server = MockServer::start().await;
    reply(&server, RESULT, 502, json!({})).await;

    let status = client_for(&server)
        .poll_status(&PollStatusRequest::new("req-1"))
        .await;

    let error = status.error().unwrap();
    assert_eq!(error.code, ErrorCode::PollingFailed);
    assert_eq!(error.message, "Polling failed: 502 Bad Gateway");
}

#[tokio::test]
async fn concurrent_polls_are_independent() {
    let server = MockServer::start().await;
    for (id, status) in [("a", "COMPLETED"), ("b", "QUEUED"), ("c", "FAILED")] {
        Mock::given(method("POST"))
            .and(path(RESULT))
            .and(body_partial_json(json!({"data": {"requestId": id}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"status": status, "output": format!("https://cdn.test/{}.png", id)}
            })))
            .mount(&server)
            .await;
    }

    let api = client_for(&server);
    let requests: Vec<_> = ["a", "b", "c"].iter().map(|id| PollStatusRequest::new(*id)).collect();
    let statuses = futures::future::join_all(requests.iter().map(|r| api.poll_status(r))).await;

    assert_eq!(statuses[0].status(), PollStatus::Completed);
    assert_eq!(statuses[0].result().unwrap().request_id.as_deref(), Some("a"));
    assert_eq!(statuses[1].status(), PollStatus::Processing);
    assert_eq!(statuses[2].status(), PollStatus::Failed);
}

#[tokio::test]
async fn poll_tolerates_loose_reply_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESULT))
        .and(body_partial_json(json!({"data": {"requestId": "many"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requestId": 987,
            "result": {"status": "COMPLETED", "output": ["https://cdn.test/x.png"]}
        })))
        .mount(&server)
        .await;

    let status = client_for(&server)
        .poll_status(&PollStatusRequest::new("many"))
        .await;

    assert_eq!(status.status(), PollStatus::Completed);
    let result = status.result().unwrap();
    assert_eq!(result.request_id.as_deref(), Some("many"));
    assert_eq!(result.output.as_deref(), Some("https://cdn.test/x.png"));
}
