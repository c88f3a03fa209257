use serde_json::{Map, Value};
use tracing::info;

use crate::models::{Session, TaskType};

/// Extracted resume text plus the name of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedContext {
    pub resume_text: String,
    pub file_name: String,
    pub size_bytes: usize,
}

/// Holds the session identity and the single current resume context.
/// The context has no history: a new upload replaces the old one.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
    uploaded: Option<UploadedContext>,
}

impl SessionContext {
    pub fn new() -> Self {
        let session = Session::start();
        info!(session_id = %session.id, "session started");
        Self {
            session,
            uploaded: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn uploaded(&self) -> Option<&UploadedContext> {
        self.uploaded.as_ref()
    }

    pub fn has_context(&self) -> bool {
        self.uploaded.is_some()
    }

    /// Accepts any extraction result as-is.
    pub fn set_upload(&mut self, uploaded: UploadedContext) {
        if let Some(previous) = &self.uploaded {
            info!(
                previous = %previous.file_name,
                current = %uploaded.file_name,
                "replacing resume context"
            );
        }
        self.uploaded = Some(uploaded);
    }

    /// The `context` object attached to outgoing chat and feedback requests.
    pub fn context_payload(&self) -> Option<Map<String, Value>> {
        let uploaded = self.uploaded.as_ref()?;
        let mut payload = Map::new();
        payload.insert(
            "resume_text".to_string(),
            Value::String(uploaded.resume_text.clone()),
        );
        payload.insert(
            "resume_file_name".to_string(),
            Value::String(uploaded.file_name.clone()),
        );
        Some(payload)
    }

    pub fn record_turn(&mut self, appended: u32, task_type: Option<TaskType>) {
        self.session.touch(appended, task_type);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
