use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Intent tag for a chat turn. Drives both backend routing and the
/// "Current mode" line in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    JdAnalysis,
    ResumeScreening,
    BooleanSearch,
    SalaryResearch,
    BiasCheck,
    CandidateOutreach,
    Analytics,
    General,
    /// Tag the backend introduced that this client does not know yet.
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::JdAnalysis => "jd_analysis",
            TaskType::ResumeScreening => "resume_screening",
            TaskType::BooleanSearch => "boolean_search",
            TaskType::SalaryResearch => "salary_research",
            TaskType::BiasCheck => "bias_check",
            TaskType::CandidateOutreach => "candidate_outreach",
            TaskType::Analytics => "analytics",
            TaskType::General => "general",
            TaskType::Other(raw) => raw,
        }
    }

    /// Human-readable form: `salary_research` -> `salary research`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TaskType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "jd_analysis" => TaskType::JdAnalysis,
            "resume_screening" => TaskType::ResumeScreening,
            "boolean_search" => TaskType::BooleanSearch,
            "salary_research" => TaskType::SalaryResearch,
            "bias_check" => TaskType::BiasCheck,
            "candidate_outreach" => TaskType::CandidateOutreach,
            "analytics" => TaskType::Analytics,
            "general" => TaskType::General,
            _ => TaskType::Other(raw),
        }
    }
}

impl From<TaskType> for String {
    fn from(task: TaskType) -> Self {
        match task {
            TaskType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for TaskType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TaskType::from(s.to_string()))
    }
}
