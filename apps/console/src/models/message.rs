use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(s)
    }
}

/// A reference the backend attached to an assistant answer (web search hit, etc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One entry of the conversation log. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub task_type: Option<super::TaskType>,
    pub modules_loaded: Option<Vec<String>>,
    pub sources: Option<Vec<Source>>,
    pub metadata: Option<Map<String, Value>>,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            task_type: None,
            modules_loaded: None,
            sources: None,
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content.into())
    }

    /// Synthetic assistant message standing in for a reply that never came.
    pub fn failure(reason: impl fmt::Display) -> Self {
        Self::assistant(format!("Sorry, I encountered an error: {reason}"))
    }

    pub fn with_task_type(mut self, task_type: Option<super::TaskType>) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_modules(mut self, modules: Option<Vec<String>>) -> Self {
        self.modules_loaded = modules;
        self
    }

    pub fn with_sources(mut self, sources: Option<Vec<Source>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Map<String, Value>>) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_is_assistant_role() {
        let msg = Message::failure("connection refused");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(
            msg.content,
            "Sorry, I encountered an error: connection refused"
        );
        assert!(msg.task_type.is_none());
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_source_without_content_deserializes() {
        let source: Source =
            serde_json::from_str(r#"{"title":"Levels","url":"https://levels.fyi"}"#).unwrap();
        assert_eq!(source.title, "Levels");
        assert!(source.content.is_none());
    }
}
