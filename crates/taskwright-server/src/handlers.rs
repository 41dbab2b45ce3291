//! HTTP request handlers for the task extraction service.
//!
//! Thin JSON wrappers around [`ExtractionPipeline`]; every `/process_input`
//! call answers `200 OK` with either a task or a message envelope.

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use taskwright_domain::{Priority, Task, TextCompletion};
use taskwright_extractor::{ExtractionOutcome, ExtractionPipeline};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared application state
pub struct AppState<L: TextCompletion> {
    /// Extraction pipeline shared by all requests
    pub pipeline: Arc<ExtractionPipeline<L>>,
}

impl<L: TextCompletion> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Task extraction request
#[derive(Debug, Default, Deserialize)]
pub struct ProcessInputRequest {
    /// Free-form user input; non-string JSON is stringified
    #[serde(default)]
    pub user_input: serde_json::Value,

    /// Earlier turns; accepted for client compatibility, never used
    #[serde(default)]
    pub conversation_history: Vec<serde_json::Value>,

    /// "Today" for relative dates; the server's current date when absent
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,
}

impl ProcessInputRequest {
    fn input_text(&self) -> String {
        match &self.user_input {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Task as sent to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskData {
    /// Category label
    #[serde(rename = "type")]
    pub task_type: String,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// `low`, `medium` or `high`
    pub priority: String,
    /// RFC 3339 timestamp
    pub completion_date: String,
    /// Optional fields (Classification, Autocomplete) the model filled in
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl From<&Task> for TaskData {
    fn from(task: &Task) -> Self {
        Self {
            task_type: task.task_type().to_string(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            priority: task.priority().as_str().to_string(),
            completion_date: task.completion_date().to_rfc3339(),
            extras: task.extras().clone(),
        }
    }
}

/// Response envelope: `{"type": "task" | "message", "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ProcessInputResponse {
    /// Extraction produced a task
    Task(TaskData),
    /// Extraction produced a message for the user
    Message(String),
}

impl From<ExtractionOutcome> for ProcessInputResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        match outcome {
            ExtractionOutcome::Task { task } => ProcessInputResponse::Task(TaskData::from(&task)),
            ExtractionOutcome::Message { text } => ProcessInputResponse::Message(text),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// GET / - Greeting
async fn index() -> &'static str {
    "Hello from Taskwright!"
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
    })
}

/// GET /get_task_types - Categories the model chooses from
async fn get_task_types<L>(State(state): State<AppState<L>>) -> Json<Vec<String>>
where
    L: TextCompletion + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    Json(state.pipeline.prompt().categories.clone())
}

/// GET /get_priority_options - Accepted priorities
async fn get_priority_options() -> Json<Vec<&'static str>> {
    Json(Priority::ALL.iter().map(Priority::as_str).collect())
}

/// POST /process_input - Extract a task from free-form input
async fn process_input<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<ProcessInputRequest>,
) -> Json<ProcessInputResponse>
where
    L: TextCompletion + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let input = request.input_text();
    let anchor = request.anchor_date.unwrap_or_else(|| {
        Utc::now()
            .with_timezone(&state.pipeline.resolver().offset())
            .date_naive()
    });

    debug!(
        input_len = input.len(),
        history_len = request.conversation_history.len(),
        %anchor,
        "Received user input"
    );

    let outcome = state.pipeline.run(&input, anchor).await;
    Json(outcome.into())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> AxumRouter
where
    L: TextCompletion + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    AxumRouter::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/get_task_types", get(get_task_types::<L>))
        .route("/get_priority_options", get(get_priority_options))
        .route("/process_input", post(process_input::<L>))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
