use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::api_client::{FeedbackAck, FeedbackRequest, RecruiterBackend};
use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Hallucination,
    Bias,
    Error,
    Suggestion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {field} '{value}' (expected one of: {expected})")]
pub struct ParseFeedbackError {
    field: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for FeedbackKind {
    type Err = ParseFeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hallucination" => Ok(FeedbackKind::Hallucination),
            "bias" => Ok(FeedbackKind::Bias),
            "error" => Ok(FeedbackKind::Error),
            "suggestion" => Ok(FeedbackKind::Suggestion),
            _ => Err(ParseFeedbackError {
                field: "feedback type",
                value: s.to_string(),
                expected: "hallucination, bias, error, suggestion",
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseFeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseFeedbackError {
                field: "severity",
                value: s.to_string(),
                expected: "info, warning, error, critical",
            }),
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedbackKind::Hallucination => "hallucination",
            FeedbackKind::Bias => "bias",
            FeedbackKind::Error => "error",
            FeedbackKind::Suggestion => "suggestion",
        };
        f.write_str(s)
    }
}

/// User-authored report about an assistant answer, not yet tied to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub kind: FeedbackKind,
    pub severity: Severity,
    pub message: String,
}

impl FeedbackDraft {
    pub fn new(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::default(),
            message: message.into(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn into_request(
        self,
        session_id: &str,
        context: Option<Map<String, Value>>,
    ) -> FeedbackRequest {
        FeedbackRequest {
            session_id: session_id.to_string(),
            feedback_type: self.kind,
            message: self.message,
            context,
            severity: Some(self.severity),
        }
    }
}

/// POST one report. Fire and forget from the user's point of view.
pub async fn submit(
    backend: &dyn RecruiterBackend,
    request: &FeedbackRequest,
) -> Result<FeedbackAck, ClientError> {
    let ack = backend.submit_feedback(request).await?;
    info!(feedback_type = %request.feedback_type, status = %ack.status, "feedback submitted");
    Ok(ack)
}
