// Request/response bodies for the S1NGULARITY REST API.
// Field names are the compatibility surface with the backend; do not rename.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::feedback::{FeedbackKind, Severity};
use crate::models::{CandidateAnalysis, Source, TaskType};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub modules_loaded: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl ChatResponse {
    /// Decodes `metadata.analysis`, if the backend attached one.
    pub fn analysis(&self) -> Option<Result<CandidateAnalysis, serde_json::Error>> {
        let raw = self.metadata.as_ref()?.get("analysis")?;
        if raw.is_null() {
            return None;
        }
        Some(serde_json::from_value(raw.clone()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub feedback_type: FeedbackKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackAck {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub services: ServiceStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub database: bool,
    #[serde(default)]
    pub jobdiva: bool,
    #[serde(default)]
    pub llm: bool,
    #[serde(default)]
    pub web_search: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub text: String,
}

/// FastAPI-style error body. `detail` is a string for handler errors and
/// a list for validation errors, so only the string form is used.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<Value>,
}
