use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::ImageMimeType;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

use crate::encoding::decode_base64;

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
    status: StatusCode,
    body: Arc<String>,
}

async fn handle_stage(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    (
        state.status,
        [("content-type", "application/json")],
        state.body.as_str().to_string(),
    )
}

async fn spawn_stage_server(
    status: StatusCode,
    body: impl Into<String>,
) -> (String, oneshot::Receiver<Value>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        body: Arc::new(body.into()),
    };
    let app = Router::new()
        .route("/api/stage", post(handle_stage))
        .route("/images/staged.png", get(|| async { b"png-bytes".to_vec() }))
        .route("/images/missing.png", get(|| async { StatusCode::NOT_FOUND }))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn sample_image() -> CapturedImage {
    CapturedImage::new(
        vec![0u8, 1, 2, 250, 251, 252, 255, b'\n', b'=', 0x80],
        ImageMimeType::Jpeg,
        "room.jpg",
    )
}

#[tokio::test]
async fn posts_base64_image_and_returns_image_url() {
    let (server_url, payload_rx) =
        spawn_stage_server(StatusCode::OK, json!({ "imageUrl": "X" }).to_string()).await;
    let client = HttpStagingClient::new(&server_url).expect("client");
    let image = sample_image();

    let url = client
        .stage(&image, StagingStyle::Scandinavian, "add a rug")
        .await
        .expect("stage");
    assert_eq!(url, "X");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(payload["image"]["mimeType"], "image/jpeg");
    assert_eq!(payload["style"], "Scandinavian");
    assert_eq!(payload["description"], "add a rug");
    let data = payload["image"]["data"].as_str().expect("data string");
    assert!(!data.starts_with("data:"));
    assert_eq!(decode_base64(data).expect("decode"), image.bytes());
}

#[tokio::test]
async fn non_success_status_surfaces_server_error_detail() {
    let (server_url, _rx) = spawn_stage_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "model overloaded" }).to_string(),
    )
    .await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        StagingError::Service {
            status: 500,
            reason: "Internal Server Error".to_string(),
            detail: "model overloaded".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Failed to stage the room: API Error: 500 Internal Server Error - model overloaded"
    );
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_detail() {
    let (server_url, _rx) = spawn_stage_server(StatusCode::BAD_GATEWAY, "upstream down").await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        StagingError::Service { status: 502, ref detail, .. } if detail == UNKNOWN_SERVER_ERROR
    ));
}

#[tokio::test]
async fn error_body_without_message_reports_no_details() {
    let (server_url, _rx) = spawn_stage_server(StatusCode::BAD_REQUEST, "{}").await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(err.to_string().ends_with("400 Bad Request - No error details"));
}

#[tokio::test]
async fn non_string_error_field_is_stringified() {
    let (server_url, _rx) = spawn_stage_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": 42 }).to_string(),
    )
    .await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert_eq!(
        err.to_string(),
        "Failed to stage the room: API Error: 500 Internal Server Error - 42"
    );
}

#[tokio::test]
async fn non_object_json_error_body_reports_no_details() {
    let (server_url, _rx) = spawn_stage_server(StatusCode::SERVICE_UNAVAILABLE, "[1,2]").await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        StagingError::Service { status: 503, ref detail, .. } if detail == NO_ERROR_DETAILS
    ));
}

#[tokio::test]
async fn missing_image_url_is_an_error() {
    let (server_url, _rx) =
        spawn_stage_server(StatusCode::OK, json!({ "status": "done" }).to_string()).await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert_eq!(err, StagingError::MissingImageUrl);
    assert_eq!(
        err.user_message(),
        "Failed to stage the room: API did not return a valid image URL."
    );
}

#[tokio::test]
async fn malformed_success_payload_is_an_error() {
    let (server_url, _rx) = spawn_stage_server(StatusCode::OK, "<html>ok</html>").await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(matches!(err, StagingError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpStagingClient::new(&format!("http://{addr}")).expect("client");

    let err = client
        .stage(&sample_image(), StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(matches!(err, StagingError::Transport(_)));
}

#[tokio::test]
async fn empty_image_fails_before_any_request() {
    let (server_url, payload_rx) =
        spawn_stage_server(StatusCode::OK, json!({ "imageUrl": "X" }).to_string()).await;
    let client = HttpStagingClient::new(&server_url).expect("client");
    let empty = CapturedImage::new(Vec::new(), ImageMimeType::Png, "empty.png");

    let err = client
        .stage(&empty, StagingStyle::Modern, "")
        .await
        .expect_err("must fail");

    assert!(matches!(err, StagingError::Encoding(_)));
    drop(client);
    let waited = tokio::time::timeout(std::time::Duration::from_millis(200), payload_rx).await;
    assert!(waited.is_err(), "no request should reach the server");
}

#[tokio::test]
async fn fetches_relative_and_data_urls() {
    let (server_url, _rx) = spawn_stage_server(StatusCode::OK, "{}").await;
    let client = HttpStagingClient::new(&server_url).expect("client");

    let bytes = client
        .fetch_image("/images/staged.png")
        .await
        .expect("relative fetch");
    assert_eq!(bytes, b"png-bytes");

    let bytes = client
        .fetch_image("data:image/png;base64,aGVsbG8=")
        .await
        .expect("data url");
    assert_eq!(bytes, b"hello");

    let err = client
        .fetch_image("/images/missing.png")
        .await
        .expect_err("404");
    assert_eq!(
        err,
        StagingError::Download {
            status: 404,
            reason: "Not Found".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Failed to load the staged image: 404 Not Found");
    assert!(!err.to_string().contains("Failed to stage the room"));
}

#[test]
fn rejects_invalid_server_url() {
    assert!(matches!(
        HttpStagingClient::new("not a url"),
        Err(StagingError::Validation(_))
    ));
}
