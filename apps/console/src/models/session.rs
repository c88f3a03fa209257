use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TaskType;

/// A single continuous conversation with the backend assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub message_count: u32,
    pub task_type: Option<TaskType>,
}

impl Session {
    /// Starts a session with a random v4 id. Generated once; never regenerated.
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            id: format!("session-{}", Uuid::new_v4()),
            created_at: now,
            last_active: now,
            message_count: 0,
            task_type: None,
        }
    }

    pub fn touch(&mut self, appended: u32, task_type: Option<TaskType>) {
        self.message_count += appended;
        self.last_active = Utc::now();
        if task_type.is_some() {
            self.task_type = task_type;
        }
    }
}
