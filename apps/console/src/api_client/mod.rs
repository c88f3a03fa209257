//! API client for the S1NGULARITY backend.
//!
//! Every network call in the console goes through `ApiClient`; the rest of
//! the crate talks to it through the `RecruiterBackend` trait so tests can
//! substitute an in-memory backend.
//!
//! No retries: each operation is a single request/response pair and a
//! failure is handed straight back to the caller.
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::ClientError;
use crate::upload::ResumeFile;

pub mod wire;

pub use wire::{
    ChatRequest, ChatResponse, FeedbackAck, FeedbackRequest, HealthResponse, ServiceStatus,
    UploadResponse,
};

/// The four endpoints this client consumes.
#[async_trait]
pub trait RecruiterBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    async fn submit_feedback(&self, request: &FeedbackRequest)
        -> Result<FeedbackAck, ClientError>;

    async fn check_health(&self) -> Result<HealthResponse, ClientError>;

    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadResponse, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecruiterBackend for ApiClient {
    /// POST /chat
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        debug!(
            session_id = request.session_id.as_deref().unwrap_or("-"),
            task_type = request.task_type.as_ref().map(|t| t.as_str()).unwrap_or("-"),
            has_context = request.context.is_some(),
            "sending chat message"
        );
        let response = self.client.post(self.url("/chat")).json(request).send().await?;
        decode(response, "API request").await
    }

    /// POST /feedback
    async fn submit_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<FeedbackAck, ClientError> {
        let response = self
            .client
            .post(self.url("/feedback"))
            .json(request)
            .send()
            .await?;
        decode(response, "Feedback submission").await
    }

    /// GET /health
    async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        decode(response, "Health check").await
    }

    /// POST /upload-resume (multipart, field `file`)
    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadResponse, ClientError> {
        let part = multipart::Part::stream(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new().part("file", part);

        debug!(
            file_name = %file.file_name,
            size = file.bytes.len(),
            "uploading resume"
        );
        let response = self
            .client
            .post(self.url("/upload-resume"))
            .multipart(form)
            .send()
            .await?;
        decode(response, "Resume upload").await
    }
}

/// Turns a response into `T`, or into `ClientError::Api` for any non-2xx status.
async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_detail(&body).unwrap_or_else(|| {
            format!(
                "{operation} failed: {}",
                status.canonical_reason().unwrap_or("Unknown error")
            )
        });
        warn!("{operation} returned {status}: {message}");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(ClientError::Parse)
}

fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<wire::ErrorBody>(body)
        .ok()?
        .detail?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskType;
    use bytes::Bytes;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = Config::default().with_api_url(Some(server.uri()));
        ApiClient::new(&config).unwrap()
    }

    fn chat_request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            session_id: Some("session-test".into()),
            task_type: Some(TaskType::SalaryResearch),
            context: None,
        }
    }

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Agent processing failed: boom"}"#).as_deref(),
            Some("Agent processing failed: boom")
        );
    }

    #[test]
    fn test_error_detail_ignores_validation_list_and_garbage() {
        assert_eq!(error_detail(r#"{"detail": [{"loc": ["body"]}]}"#), None);
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(""), None);
    }

    #[tokio::test]
    async fn test_chat_posts_wire_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_partial_json(json!({
                "message": "What does a senior SRE earn in Austin?",
                "session_id": "session-test",
                "task_type": "salary_research"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "session-test",
                "message": "Roughly $150k-$190k.",
                "task_type": "salary_research",
                "modules_loaded": ["core", "salary"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .chat(&chat_request("What does a senior SRE earn in Austin?"))
            .await
            .unwrap();
        assert_eq!(resp.message, "Roughly $150k-$190k.");
        assert_eq!(resp.modules_loaded.unwrap(), vec!["core", "salary"]);
    }

    #[tokio::test]
    async fn test_chat_error_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"detail": "Agent processing failed: LLM timeout"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).chat(&chat_request("hi")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Agent processing failed: LLM timeout");
    }

    #[tokio::test]
    async fn test_chat_error_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server).chat(&chat_request("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed: Service Unavailable");
    }

    #[tokio::test]
    async fn test_health_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "version": "1.0",
                "services": {"database": true, "jobdiva": true, "llm": true, "web_search": false}
            })))
            .mount(&server)
            .await;

        let health = client_for(&server).check_health().await.unwrap();
        assert_eq!(health.version, "1.0");
        assert!(health.services.jobdiva);
        assert!(!health.services.web_search);
    }

    #[tokio::test]
    async fn test_health_500_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).check_health().await.unwrap_err();
        assert_eq!(err.to_string(), "Health check failed: Internal Server Error");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-resume"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"jane_doe.pdf\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"text": "Experienced engineer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let file = ResumeFile {
            file_name: "jane_doe.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: Bytes::from_static(b"%PDF-1.4 fake resume"),
        };
        let resp = client_for(&server).upload_resume(&file).await.unwrap();
        assert_eq!(resp.text, "Experienced engineer");
    }

    #[tokio::test]
    async fn test_feedback_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_partial_json(json!({"feedback_type": "bias", "severity": "warning"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Feedback recorded. Thank you!"
            })))
            .mount(&server)
            .await;

        let ack = client_for(&server)
            .submit_feedback(&FeedbackRequest {
                session_id: "session-test".into(),
                feedback_type: crate::feedback::FeedbackKind::Bias,
                message: "Flagged age-coded wording".into(),
                context: None,
                severity: Some(crate::feedback::Severity::Warning),
            })
            .await
            .unwrap();
        assert_eq!(ack.status, "success");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let config = Config::default().with_api_url(Some("http://127.0.0.1:9".into()));
        let client = ApiClient::new(&config).unwrap();
        let err = client.check_health().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
