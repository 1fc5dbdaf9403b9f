use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use imagegen_tui::download::save_image;
use imagegen_tui::error::TransportError;
use imagegen_tui::generation::{
    GenerationClient, GenerationOrchestrator, HttpGenerationClient, Phase, RequestState,
    FAILED_REFINED_PROMPT, TRANSPORT_FAILURE_MESSAGE,
};
use imagegen_tui::GenerateRequest;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn handle_generate(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if let Ok(mut requests) = captured.requests.lock() {
        requests.push((content_type, body.clone()));
    }

    match body["prompt"].as_str() {
        Some("blocked") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "NSFW content blocked" })),
        )
            .into_response(),
        Some("garbage") => (StatusCode::OK, "<html>bad gateway</html>").into_response(),
        Some(prompt) => Json(json!({
            "refinedPrompt": format!("A {prompt} riding a neon dragon"),
            "image": "https://x/y.png",
        }))
        .into_response(),
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn handle_image() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/jpeg")], b"jpeg-bytes".to_vec())
}

/// Loopback traffic must not be routed through a proxy from the environment.
fn local_http() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().no_proxy().build()
}

fn local_client(base_url: impl Into<String>) -> Result<HttpGenerationClient, reqwest::Error> {
    Ok(HttpGenerationClient::with_http(local_http()?, base_url))
}

async fn spawn_backend() -> Result<(String, Captured), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/generate", post(handle_generate))
        .route("/images/result", get(handle_image))
        .with_state(captured.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), captured))
}

#[tokio::test]
async fn posts_prompt_as_json_and_reads_result() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, captured) = spawn_backend().await?;
    // Trailing slash must not produce `//api/generate`.
    let client = local_client(format!("{base_url}/"))?;

    let response = client
        .generate(&GenerateRequest::new("cyberpunk samurai"))
        .await?;

    assert_eq!(
        response.refined_prompt(),
        Some("A cyberpunk samurai riding a neon dragon")
    );
    assert_eq!(response.image(), Some("https://x/y.png"));
    assert_eq!(response.error(), None);

    let requests = captured.requests.lock().map(|r| r.clone()).unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "application/json");
    assert_eq!(requests[0].1, json!({ "prompt": "cyberpunk samurai" }));
    Ok(())
}

#[tokio::test]
async fn orchestrator_reaches_success_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _) = spawn_backend().await?;
    let mut orchestrator =
        GenerationOrchestrator::new(Arc::new(local_client(base_url)?));

    orchestrator.submit("cyberpunk samurai").await;

    assert_eq!(
        orchestrator.state(),
        &RequestState {
            is_loading: false,
            refined_prompt: "A cyberpunk samurai riding a neon dragon".to_string(),
            image: "https://x/y.png".to_string(),
            error: String::new(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn error_status_with_json_body_is_an_application_error(
) -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _) = spawn_backend().await?;
    let mut orchestrator =
        GenerationOrchestrator::new(Arc::new(local_client(base_url)?));

    orchestrator.submit("blocked").await;

    let state = orchestrator.state();
    assert_eq!(state.phase(), Phase::Failure);
    assert_eq!(state.error, "NSFW content blocked");
    assert_eq!(state.refined_prompt, FAILED_REFINED_PROMPT);
    assert_eq!(state.image, "");
    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_a_transport_failure() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _) = spawn_backend().await?;
    let client = local_client(base_url)?;

    let result = client.generate(&GenerateRequest::new("garbage")).await;
    assert!(matches!(result, Err(TransportError::Decode(_))));

    let mut orchestrator = GenerationOrchestrator::new(Arc::new(client));
    orchestrator.submit("garbage").await;
    assert_eq!(orchestrator.state().error, TRANSPORT_FAILURE_MESSAGE);
    assert!(!orchestrator.state().is_loading);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = local_client(format!("http://{addr}"))?;
    let result = client.generate(&GenerateRequest::new("anything")).await;
    assert!(matches!(result, Err(TransportError::Request(_))));

    let mut orchestrator = GenerationOrchestrator::new(Arc::new(client));
    orchestrator.submit("anything").await;
    assert_eq!(orchestrator.state().error, "⚠️ Failed to reach backend.");
    assert!(orchestrator.state().refined_prompt.is_empty());
    assert!(orchestrator.state().image.is_empty());
    assert!(!orchestrator.state().is_loading);
    Ok(())
}

#[tokio::test]
async fn downloads_remote_image_with_content_type_extension(
) -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _) = spawn_backend().await?;
    let dir = tempfile::tempdir()?;

    let path = save_image(
        &local_http()?,
        &format!("{base_url}/images/result"),
        dir.path(),
    )
    .await?;

    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    assert_eq!(std::fs::read(&path)?, b"jpeg-bytes");
    Ok(())
}
