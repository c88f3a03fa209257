// Conversation: the message log, the single in-flight chat turn and the
// canned quick-action prompts that feed it.

pub mod controller;
pub mod quick_actions;

pub use controller::{ChatTurn, ConversationController, PendingTurn, SendOutcome, SkipReason};
pub use quick_actions::{QuickAction, QuickActionError, ACTIONS};
