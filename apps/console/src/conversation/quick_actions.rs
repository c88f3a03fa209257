use thiserror::Error;

use crate::models::TaskType;

/// A canned prompt tied to a task type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub task_type: TaskType,
    pub prompt: &'static str,
    /// Only selectable once a resume has been uploaded.
    pub requires_context: bool,
}

pub static ACTIONS: [QuickAction; 6] = [
    QuickAction {
        id: "jd-analysis",
        label: "Analyze Job",
        task_type: TaskType::JdAnalysis,
        prompt: "Analyze this job description and provide a detailed breakdown.",
        requires_context: false,
    },
    QuickAction {
        id: "resume-screen",
        label: "Screen Resume",
        task_type: TaskType::ResumeScreening,
        prompt: "Screen this candidate's resume and provide a match score.",
        requires_context: true,
    },
    QuickAction {
        id: "boolean-search",
        label: "Boolean Query",
        task_type: TaskType::BooleanSearch,
        prompt: "Generate a boolean search query for this role.",
        requires_context: false,
    },
    QuickAction {
        id: "salary-research",
        label: "Salary Data",
        task_type: TaskType::SalaryResearch,
        prompt: "What is the market salary range for this position?",
        requires_context: false,
    },
    QuickAction {
        id: "outreach",
        label: "Draft Email",
        task_type: TaskType::CandidateOutreach,
        prompt: "Draft an outreach email for this candidate.",
        requires_context: true,
    },
    QuickAction {
        id: "bias-check",
        label: "Bias Check",
        task_type: TaskType::BiasCheck,
        prompt: "Check this job description for potential bias.",
        requires_context: false,
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuickActionError {
    #[error("Unknown quick action '{0}'. Type /actions to list them.")]
    Unknown(String),

    #[error("'{0}' needs a resume. Upload one with /upload <path> first.")]
    RequiresContext(&'static str),

    #[error("Still waiting on the previous reply.")]
    Busy,
}

impl QuickAction {
    pub fn is_enabled(&self, has_context: bool) -> bool {
        !self.requires_context || has_context
    }
}

/// Looks up an action and checks it is selectable right now.
pub fn select(id: &str, has_context: bool) -> Result<&'static QuickAction, QuickActionError> {
    let action = ACTIONS
        .iter()
        .find(|a| a.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| QuickActionError::Unknown(id.to_string()))?;

    if !action.is_enabled(has_context) {
        return Err(QuickActionError::RequiresContext(action.label));
    }
    Ok(action)
}
