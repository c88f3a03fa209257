use std::sync::Arc;

use tracing::info;

use crate::api_client::{FeedbackAck, FeedbackRequest, RecruiterBackend};
use crate::conversation::controller::{ChatTurn, PendingTurn, SendOutcome, SkipReason};
use crate::conversation::quick_actions::{self, QuickActionError};
use crate::conversation::ConversationController;
use crate::errors::ClientError;
use crate::feedback::{self, FeedbackDraft};
use crate::health::{self, Connectivity};
use crate::models::{CandidateAnalysis, TaskType};
use crate::session::{SessionContext, UploadedContext};
use crate::upload::{PendingUpload, ResumeFile, UploadAdapter, UploadError, UploadState};

/// The recruiter's workspace: one session, one conversation, one upload
/// card and the backend connectivity indicator.
pub struct RecruiterDesk {
    backend: Arc<dyn RecruiterBackend>,
    session: SessionContext,
    conversation: Arc<ConversationController>,
    uploader: UploadAdapter,
    connectivity: Connectivity,
}

impl RecruiterDesk {
    pub fn new(backend: Arc<dyn RecruiterBackend>) -> Self {
        Self {
            session: SessionContext::new(),
            conversation: ConversationController::new(Arc::clone(&backend)),
            uploader: UploadAdapter::new(Arc::clone(&backend)),
            connectivity: Connectivity::Checking,
            backend,
        }
    }

    pub fn backend(&self) -> Arc<dyn RecruiterBackend> {
        Arc::clone(&self.backend)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn conversation(&self) -> &Arc<ConversationController> {
        &self.conversation
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn upload_state(&self) -> UploadState {
        self.uploader.state()
    }

    pub fn latest_analysis(&self) -> Option<CandidateAnalysis> {
        self.conversation.latest_analysis()
    }

    pub async fn refresh_health(&mut self) -> &Connectivity {
        let connectivity = health::probe(self.backend.as_ref()).await;
        self.set_connectivity(connectivity)
    }

    /// Stores a probe result obtained off the desk.
    pub fn set_connectivity(&mut self, connectivity: Connectivity) -> &Connectivity {
        self.connectivity = connectivity;
        &self.connectivity
    }

    fn turn(&self, message: String, task_type: Option<TaskType>) -> ChatTurn {
        ChatTurn {
            message,
            session_id: self.session.id().to_string(),
            task_type,
            context: self.session.context_payload(),
        }
    }

    /// Starts a chat turn from free text. The caller completes it.
    pub fn begin_chat(&self, text: &str) -> Result<PendingTurn, SkipReason> {
        self.conversation.begin(self.turn(text.to_string(), None))
    }

    /// Starts the turn for a quick action, sending its prompt with its task type.
    pub fn begin_quick_action(&self, id: &str) -> Result<PendingTurn, QuickActionError> {
        let action = quick_actions::select(id, self.session.has_context())?;
        info!(action = action.id, task_type = %action.task_type, "quick action selected");
        self.conversation
            .begin(self.turn(action.prompt.to_string(), Some(action.task_type.clone())))
            .map_err(|_| QuickActionError::Busy)
    }

    /// Folds a finished turn into the session bookkeeping.
    pub fn record(&mut self, outcome: &SendOutcome) {
        if outcome.appended() > 0 {
            self.session
                .record_turn(outcome.appended(), self.conversation.current_task());
        }
    }

    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let outcome = match self.begin_chat(text) {
            Ok(pending) => pending.complete().await,
            Err(reason) => SendOutcome::Skipped(reason),
        };
        self.record(&outcome);
        outcome
    }

    pub async fn run_quick_action(&mut self, id: &str) -> Result<SendOutcome, QuickActionError> {
        let outcome = self.begin_quick_action(id)?.complete().await;
        self.record(&outcome);
        Ok(outcome)
    }

    /// Gates the file and claims the upload card. The caller completes it.
    pub fn begin_upload(&self, file: ResumeFile) -> Result<PendingUpload, UploadError> {
        self.uploader.begin(file)
    }

    /// Folds a finished upload into the session. A failure leaves the
    /// previous resume context in place.
    pub fn finish_upload(
        &mut self,
        result: Result<UploadedContext, UploadError>,
    ) -> Result<UploadedContext, UploadError> {
        let uploaded = result?;
        self.session.set_upload(uploaded.clone());
        Ok(uploaded)
    }

    pub async fn upload(&mut self, file: ResumeFile) -> Result<UploadedContext, UploadError> {
        let result = match self.begin_upload(file) {
            Ok(pending) => pending.complete().await,
            Err(e) => Err(e),
        };
        self.finish_upload(result)
    }

    /// Attaches the session id and current resume context to a draft.
    pub fn feedback_request(&self, draft: FeedbackDraft) -> FeedbackRequest {
        draft.into_request(self.session.id(), self.session.context_payload())
    }

    pub async fn submit_feedback(&self, draft: FeedbackDraft) -> Result<FeedbackAck, ClientError> {
        let request = self.feedback_request(draft);
        feedback::submit(self.backend.as_ref(), &request).await
    }
}
