//! Integration tests for the HTTP layer

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use taskwright_extractor::{
    ExtractionPipeline, ExtractorConfig, OptionalField, PromptSpec, RETRY_LATER_MESSAGE,
};
use taskwright_llm::MockProvider;
use taskwright_server::handlers::{
    create_router, AppState, HealthCheckResponse, ProcessInputResponse,
};
use tower::ServiceExt; // for oneshot

const KITCHEN_REPLY: &str = "Type: Household Tasks\n\
                             Title: Clean kitchen\n\
                             Description: Clean the kitchen\n\
                             Priority: low\n\
                             Completion Date: tomorrow";

/// Helper to create test application state
fn create_test_state(provider: MockProvider) -> AppState<MockProvider> {
    create_state_with_config(provider, ExtractorConfig::default())
}

fn create_state_with_config(
    provider: MockProvider,
    config: ExtractorConfig,
) -> AppState<MockProvider> {
    let pipeline = ExtractionPipeline::new(provider, config).unwrap();
    AppState {
        pipeline: Arc::new(pipeline),
    }
}

async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

fn process_input_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process_input")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Taskwright"));
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_get_task_types() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder()
        .uri("/get_task_types")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let types: Vec<String> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(types.len(), 10);
    assert_eq!(types[0], "Household Tasks");
    assert_eq!(types[9], "Miscellaneous");
}

#[tokio::test]
async fn test_get_priority_options() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder()
        .uri("/get_priority_options")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let options: Vec<String> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(options, vec!["low", "medium", "high"]);
}

#[tokio::test]
async fn test_process_input_returns_task() {
    let app = create_router(create_test_state(MockProvider::new(KITCHEN_REPLY)));

    let response = app
        .oneshot(process_input_request(
            r#"{"user_input": "clean the kitchen tomorrow", "anchor_date": "2024-06-27"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["type"], "task");
    assert_eq!(json["data"]["type"], "Household Tasks");
    assert_eq!(json["data"]["title"], "Clean kitchen");
    assert_eq!(json["data"]["priority"], "low");
    assert_eq!(json["data"]["completion_date"], "2024-06-28T00:00:00+00:00");
    assert!(json["data"].get("extras").is_none());
}

#[tokio::test]
async fn test_process_input_returns_optional_fields() {
    let config = ExtractorConfig {
        prompt: PromptSpec::default().with_optional_field(OptionalField::Autocomplete),
        ..Default::default()
    };
    let reply = format!("{}\nAutocomplete: Clean the kitchen tomorrow", KITCHEN_REPLY);
    let app = create_router(create_state_with_config(MockProvider::new(reply), config));

    let response = app
        .oneshot(process_input_request(
            r#"{"user_input": "cln kitchen tmrw", "anchor_date": "2024-06-27"}"#,
        ))
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["type"], "task");
    assert_eq!(
        json["data"]["extras"]["Autocomplete"],
        "Clean the kitchen tomorrow"
    );
}

#[tokio::test]
async fn test_process_input_missing_priority() {
    let reply = KITCHEN_REPLY.replace("Priority: low\n", "");
    let app = create_router(create_test_state(MockProvider::new(reply)));

    let response = app
        .oneshot(process_input_request(
            r#"{"user_input": "clean the kitchen tomorrow", "conversation_history": [], "anchor_date": "2024-06-27"}"#,
        ))
        .await
        .unwrap();

    let parsed: ProcessInputResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        parsed,
        ProcessInputResponse::Message(
            "Please provide the following missing information: Priority".to_string()
        )
    );
}

#[tokio::test]
async fn test_process_input_provider_failure() {
    let app = create_router(create_test_state(MockProvider::failing()));

    let response = app
        .oneshot(process_input_request(r#"{"user_input": "call mom"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed: ProcessInputResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        parsed,
        ProcessInputResponse::Message(RETRY_LATER_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn test_process_input_without_anchor_uses_today() {
    let app = create_router(create_test_state(MockProvider::new(KITCHEN_REPLY)));

    let response = app
        .oneshot(process_input_request(r#"{"user_input": "clean the kitchen tomorrow"}"#))
        .await
        .unwrap();

    let parsed: ProcessInputResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(matches!(parsed, ProcessInputResponse::Task(_)));
}

#[tokio::test]
async fn test_process_input_rejects_malformed_json() {
    let app = create_router(create_test_state(MockProvider::default()));

    let response = app
        .oneshot(process_input_request("not json"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/process_input")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
