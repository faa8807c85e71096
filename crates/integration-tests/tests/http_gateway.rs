//! HTTP Gateway End-to-End Tests
//!
//! Boots the full HTTP server on an ephemeral port and drives it with a
//! real client, both against a mock runner and against the real
//! subprocess bridge.

use std::sync::Arc;
use std::time::Duration;

use adoptml_api_http::server::HttpServerHandle;
use adoptml_api_http::{HttpServer, HttpServerConfig};
use adoptml_core::application::{ModelCommand, PredictionService, UserRegistry};
use adoptml_core::port::id_provider::UuidProvider;
use adoptml_core::port::model_runner::mocks::MockModelRunner;
use adoptml_core::port::time_provider::SystemTimeProvider;
use adoptml_core::port::ModelRunner;
use adoptml_infra_process::SubprocessRunner;

async fn start_server(
    runner: Arc<dyn ModelRunner>,
    command: ModelCommand,
) -> (HttpServerHandle, String) {
    let predictions = Arc::new(PredictionService::new(
        runner,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        command,
    ));
    let users = Arc::new(UserRegistry::new());

    let server = HttpServer::new(
        HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // ephemeral
        },
        predictions,
        users,
    );
    let handle = server.start().await.unwrap();
    let base_url = format!("http://{}", handle.local_addr());
    (handle, base_url)
}

fn mock_command() -> ModelCommand {
    ModelCommand {
        program: "python3".to_string(),
        base_args: vec!["predict.py".to_string()],
        working_dir: None,
    }
}

#[tokio::test]
async fn test_predict_returns_prediction_body() {
    let runner = Arc::new(MockModelRunner::new_success(b"[3]\n".to_vec()));
    let (handle, base_url) = start_server(runner, mock_command()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base_url))
        .json(&serde_json::json!({"Age": 3, "Type": "Cat"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["prediction"], "[3]\n");

    handle.stop();
    handle.stopped().await;
}

#[tokio::test]
async fn test_predict_failure_collapses_to_textual_500() {
    let runner = Arc::new(MockModelRunner::new_exit_fail(1, "Traceback: boom".to_string()));
    let (handle, base_url) = start_server(runner, mock_command()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base_url))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert_eq!(body, "Prediction failed");

    handle.stop();
    handle.stopped().await;
}

#[tokio::test]
async fn test_predict_through_real_subprocess_bridge() {
    // The payload travels as the last argument and is echoed back by the
    // external process, standing in for the inference script
    let runner = Arc::new(SubprocessRunner::new(
        Arc::new(SystemTimeProvider),
        vec!["PATH".to_string()],
        Some(Duration::from_secs(10)),
    ));
    let command = ModelCommand {
        program: "sh".to_string(),
        base_args: vec![
            "-c".to_string(),
            "printf %s \"$1\"".to_string(),
            "sh".to_string(),
        ],
        working_dir: None,
    };
    let (handle, base_url) = start_server(runner, command).await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base_url))
        .json(&serde_json::json!({"Age": 3}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["prediction"], "{\"Age\":3}");

    handle.stop();
    handle.stopped().await;
}

#[tokio::test]
async fn test_create_user_lifecycle() {
    let runner = Arc::new(MockModelRunner::new_success(Vec::<u8>::new()));
    let (handle, base_url) = start_server(runner, mock_command()).await;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/createUser", base_url))
        .json(&serde_json::json!({"username": "alice", "details": {"city": "Utrecht"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let duplicate = client
        .post(format!("{}/createUser", base_url))
        .json(&serde_json::json!({"username": "alice", "details": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), 409);

    let invalid = client
        .post(format!("{}/createUser", base_url))
        .json(&serde_json::json!({"username": "", "details": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), 400);

    handle.stop();
    handle.stopped().await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let runner = Arc::new(MockModelRunner::new_success(Vec::<u8>::new()));
    let (handle, base_url) = start_server(runner, mock_command()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["service"], "adoptml-gateway");

    handle.stop();
    handle.stopped().await;
}
