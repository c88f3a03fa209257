use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::api_client::{ChatRequest, RecruiterBackend};
use crate::models::{CandidateAnalysis, Message, TaskType};

/// Everything one outgoing chat message needs, snapshotted from the session.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub session_id: String,
    /// Overrides the controller's current task type for this turn only.
    pub task_type: Option<TaskType>,
    pub context: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    InFlight,
}

#[derive(Debug, Clone)]
pub enum SendOutcome {
    Skipped(SkipReason),
    Replied(Message),
    /// Transport or backend failure, surfaced as a synthetic assistant message.
    Failed(Message),
}

impl SendOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            SendOutcome::Skipped(_) => None,
            SendOutcome::Replied(m) | SendOutcome::Failed(m) => Some(m),
        }
    }

    /// Messages this send added to the log (user + assistant).
    pub fn appended(&self) -> u32 {
        match self {
            SendOutcome::Skipped(_) => 0,
            _ => 2,
        }
    }
}

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<Message>,
    current_task: Option<TaskType>,
    latest_analysis: Option<CandidateAnalysis>,
}

/// Owns the append-only message log. All mutation goes through `begin`
/// and `PendingTurn::complete`; at most one turn is in flight at a time.
pub struct ConversationController {
    backend: Arc<dyn RecruiterBackend>,
    state: Mutex<ConversationState>,
    in_flight: AtomicBool,
}

impl ConversationController {
    pub fn new(backend: Arc<dyn RecruiterBackend>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            state: Mutex::new(ConversationState::default()),
            in_flight: AtomicBool::new(false),
        })
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates the input, claims the in-flight slot and appends the user
    /// message. Nothing is appended and no slot is taken when skipped.
    pub fn begin(self: &Arc<Self>, turn: ChatTurn) -> Result<PendingTurn, SkipReason> {
        if turn.message.trim().is_empty() {
            debug!("ignoring empty chat input");
            return Err(SkipReason::EmptyInput);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("chat send ignored: a reply is still pending");
            return Err(SkipReason::InFlight);
        }
        let slot = InFlightSlot {
            controller: Arc::clone(self),
            answered: false,
        };

        let user = Message::user(turn.message.clone());
        let task_type = {
            let mut state = self.state();
            state.messages.push(user.clone());
            turn.task_type.or_else(|| state.current_task.clone())
        };

        Ok(PendingTurn {
            slot,
            user,
            request: ChatRequest {
                message: turn.message,
                session_id: Some(turn.session_id),
                task_type,
                context: turn.context,
            },
        })
    }

    /// `begin` followed by `complete`.
    pub async fn send(self: &Arc<Self>, turn: ChatTurn) -> SendOutcome {
        match self.begin(turn) {
            Ok(pending) => pending.complete().await,
            Err(reason) => SendOutcome::Skipped(reason),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.state().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().messages.is_empty()
    }

    pub fn current_task(&self) -> Option<TaskType> {
        self.state().current_task.clone()
    }

    pub fn latest_analysis(&self) -> Option<CandidateAnalysis> {
        self.state().latest_analysis.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the in-flight flag when dropped, whichever way the turn ends.
/// A turn that never got its reply is closed with a synthetic one so every
/// user message stays paired.
struct InFlightSlot {
    controller: Arc<ConversationController>,
    answered: bool,
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        if !self.answered {
            warn!("chat turn dropped before its reply arrived");
            self.controller
                .state()
                .messages
                .push(Message::failure("request cancelled"));
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

/// A chat turn whose user message is already in the log and whose reply
/// has not arrived yet. Dropping it without completing frees the slot and
/// appends a cancellation reply.
pub struct PendingTurn {
    slot: InFlightSlot,
    user: Message,
    request: ChatRequest,
}

impl PendingTurn {
    pub fn user_message(&self) -> &Message {
        &self.user
    }

    pub fn task_type(&self) -> Option<&TaskType> {
        self.request.task_type.as_ref()
    }

    /// Sends the request and appends exactly one assistant message.
    pub async fn complete(mut self) -> SendOutcome {
        let result = self.slot.controller.backend.chat(&self.request).await;
        self.slot.answered = true;

        let mut state = self.slot.controller.state();
        match result {
            Ok(response) => {
                if let Some(task) = &response.task_type {
                    state.current_task = Some(task.clone());
                }
                match response.analysis() {
                    Some(Ok(analysis)) => state.latest_analysis = Some(analysis),
                    Some(Err(e)) => warn!("ignoring malformed analysis metadata: {e}"),
                    None => {}
                }

                let reply = Message::assistant(response.message)
                    .with_task_type(response.task_type)
                    .with_modules(response.modules_loaded)
                    .with_sources(response.sources)
                    .with_metadata(response.metadata);
                state.messages.push(reply.clone());
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                error!("Chat error: {e}");
                let failure = Message::failure(&e);
                state.messages.push(failure.clone());
                SendOutcome::Failed(failure)
            }
        }
    }
}
