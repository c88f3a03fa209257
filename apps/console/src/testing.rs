//! In-memory `RecruiterBackend` for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::api_client::{
    ChatRequest, ChatResponse, FeedbackAck, FeedbackRequest, HealthResponse, RecruiterBackend,
    UploadResponse,
};
use crate::errors::ClientError;
use crate::upload::ResumeFile;

#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Value>>,
    chat_error: Option<String>,
    upload_text: Option<String>,
    upload_error: Option<String>,
    health_status: Option<u16>,
    gated: bool,
    gate: Notify,
    chat_requests: Mutex<Vec<ChatRequest>>,
    feedback_requests: Mutex<Vec<FeedbackRequest>>,
    upload_calls: AtomicUsize,
}

impl FakeBackend {
    /// Queues a `/chat` response body. Unqueued calls get a plain "ok" reply.
    pub fn with_reply(self, body: Value) -> Self {
        self.replies.lock().unwrap().push_back(body);
        self
    }

    pub fn failing_chat(mut self, detail: &str) -> Self {
        self.chat_error = Some(detail.to_string());
        self
    }

    pub fn with_upload_text(mut self, text: &str) -> Self {
        self.upload_text = Some(text.to_string());
        self
    }

    pub fn failing_uploads(mut self, detail: &str) -> Self {
        self.upload_error = Some(detail.to_string());
        self
    }

    pub fn failing_health(mut self, status: u16) -> Self {
        self.health_status = Some(status);
        self
    }

    /// Chat, upload and health calls block until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn feedback_requests(&self) -> Vec<FeedbackRequest> {
        self.feedback_requests.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self) {
        if self.gated {
            self.gate.notified().await;
        }
    }
}

fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl RecruiterBackend for FakeBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.wait_for_gate().await;

        if let Some(detail) = &self.chat_error {
            return Err(api_error(500, detail));
        }
        let body = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            json!({"session_id": request.session_id, "message": "ok"})
        });
        Ok(serde_json::from_value(body)?)
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<FeedbackAck, ClientError> {
        self.feedback_requests.lock().unwrap().push(request.clone());
        Ok(FeedbackAck {
            status: "success".into(),
            message: "Feedback recorded. Thank you!".into(),
        })
    }

    async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        self.wait_for_gate().await;
        if let Some(status) = self.health_status {
            return Err(api_error(status, "Health check failed: Internal Server Error"));
        }
        Ok(serde_json::from_value(json!({
            "status": "ok",
            "version": "1.0",
            "services": {"database": true, "jobdiva": true, "llm": true, "web_search": false}
        }))?)
    }

    async fn upload_resume(&self, _file: &ResumeFile) -> Result<UploadResponse, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        if let Some(detail) = &self.upload_error {
            return Err(api_error(400, detail));
        }
        Ok(UploadResponse {
            text: self.upload_text.clone().unwrap_or_default(),
        })
    }
}
