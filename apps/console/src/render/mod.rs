// Plain-text rendering for the terminal. Every function returns a String
// so the REPL decides where it goes and tests can assert on it.

mod analysis;
mod chat;

pub use analysis::{analysis_panel, format_percent};
pub use chat::{current_mode, message, pending_indicator, welcome};

use std::fmt::Write;

use crate::conversation::ACTIONS;
use crate::health::Connectivity;
use crate::session::UploadedContext;
use crate::upload::UploadState;

pub fn header(connectivity: &Connectivity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "S1NGULARITY | AI-Powered Recruiting Intelligence");
    let _ = write!(out, "Backend: {}", connectivity.label());
    if let Connectivity::Connected(health) = connectivity {
        let _ = write!(out, " (v{})", health.version);
        let offline: Vec<&str> = [
            ("database", health.services.database),
            ("jobdiva", health.services.jobdiva),
            ("llm", health.services.llm),
            ("web_search", health.services.web_search),
        ]
        .into_iter()
        .filter(|(_, up)| !up)
        .map(|(name, _)| name)
        .collect();
        if !offline.is_empty() {
            let _ = write!(out, " [unavailable: {}]", offline.join(", "));
        }
    }
    out
}

pub fn quick_actions(has_context: bool) -> String {
    let mut out = String::from("Quick Actions\n");
    for action in ACTIONS.iter() {
        let marker = if action.is_enabled(has_context) {
            " "
        } else {
            "x"
        };
        let _ = writeln!(out, " [{marker}] {:<16} {}", action.id, action.label);
    }
    if !has_context {
        out.push_str("Upload a resume to enable context-specific actions\n");
    }
    out
}

pub fn upload_card(state: &UploadState) -> String {
    match state {
        UploadState::Empty => "Upload Resume (PDF): /upload <path>".to_string(),
        UploadState::Uploading {
            file_name,
            size_bytes,
        } => format!("{file_name} ({}) Processing resume...", kilobytes(*size_bytes)),
        UploadState::Loaded {
            file_name,
            size_bytes,
        } => format!("{file_name} ({})", kilobytes(*size_bytes)),
    }
}

/// The resume attached to outgoing requests. Independent of the upload
/// card, which resets on a failed re-upload while the old context stays.
pub fn current_resume(uploaded: Option<&UploadedContext>) -> Option<String> {
    let uploaded = uploaded?;
    Some(format!(
        "Current Resume: {} ({})",
        uploaded.file_name,
        kilobytes(uploaded.size_bytes)
    ))
}

fn kilobytes(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

pub fn help() -> &'static str {
    "\
Type a message and press Enter to chat.
  /upload <path>                       upload a resume PDF
  /actions                             list quick actions
  /action <id>                         run a quick action
  /analysis                            show the candidate analysis panel
  /feedback <type> [severity] <text>   report hallucination|bias|error|suggestion
  /health                              re-check the backend
  /history                             reprint the conversation
  /help                                this text
  /quit                                exit"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::HealthResponse;
    use serde_json::json;

    #[test]
    fn test_header_connected_lists_offline_services() {
        let health: HealthResponse = serde_json::from_value(json!({
            "status": "ok",
            "version": "1.0",
            "services": {"database": true, "jobdiva": true, "llm": true, "web_search": false}
        }))
        .unwrap();
        let out = header(&Connectivity::Connected(health));
        assert!(out.contains("Backend: Connected (v1.0)"));
        assert!(out.contains("[unavailable: web_search]"));
    }

    #[test]
    fn test_header_disconnected() {
        let out = header(&Connectivity::Disconnected("refused".into()));
        assert!(out.ends_with("Backend: Disconnected"));
    }

    #[test]
    fn test_quick_actions_marks_gated_entries() {
        let out = quick_actions(false);
        assert!(out.contains("[x] resume-screen"));
        assert!(out.contains("[ ] bias-check"));
        assert!(out.contains("Upload a resume to enable"));
        assert!(!quick_actions(true).contains("[x]"));
    }

    #[test]
    fn test_upload_card_states() {
        assert!(upload_card(&UploadState::Empty).starts_with("Upload Resume (PDF)"));
        let loading = upload_card(&UploadState::Uploading {
            file_name: "cv.pdf".into(),
            size_bytes: 2048,
        });
        assert_eq!(loading, "cv.pdf (2.00 KB) Processing resume...");
    }

    #[test]
    fn test_current_resume_line() {
        assert_eq!(current_resume(None), None);
        let uploaded = UploadedContext {
            resume_text: "text".into(),
            file_name: "cv.pdf".into(),
            size_bytes: 3072,
        };
        assert_eq!(
            current_resume(Some(&uploaded)).as_deref(),
            Some("Current Resume: cv.pdf (3.00 KB)")
        );
    }
}
