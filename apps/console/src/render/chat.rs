use std::fmt::Write;

use chrono::Local;

use crate::models::{Message, Role, TaskType};

pub fn welcome() -> &'static str {
    "\
Welcome to S1NGULARITY
Your AI-powered recruiting assistant. Ask me anything about:
  • Job description analysis
  • Resume screening
  • Salary research
  • Boolean search queries
  • Candidate outreach"
}

pub fn pending_indicator() -> &'static str {
    "Thinking..."
}

pub fn current_mode(task: Option<&TaskType>) -> Option<String> {
    task.map(|t| format!("Current mode: {}", t.label()))
}

pub fn message(msg: &Message) -> String {
    let who = match msg.role {
        Role::User => "You",
        Role::Assistant => "S1NGULARITY",
        Role::System => "System",
    };
    let time = msg.timestamp.with_timezone(&Local).format("%H:%M:%S");

    let mut out = String::new();
    let _ = writeln!(out, "[{time}] {who}:");
    for line in msg.content.lines() {
        let _ = writeln!(out, "  {line}");
    }

    if msg.role == Role::Assistant {
        if let Some(modules) = &msg.modules_loaded {
            let _ = writeln!(out, "  Modules: {}", modules.join(", "));
            if let Some(task) = &msg.task_type {
                let _ = writeln!(out, "  Task: {}", task.label());
            }
        }
    }

    if let Some(sources) = msg.sources.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "  Sources:");
        for source in sources {
            let _ = writeln!(out, "    - {} <{}>", source.title, source.url);
        }
    }
    out
}
