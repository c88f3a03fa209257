use std::fmt;

use serde::{Deserialize, Serialize};

/// Scoring and flagging summary the backend may attach to a chat reply
/// under `metadata.analysis`. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnalysis {
    #[serde(default, alias = "match_score")]
    pub match_score: Option<f64>,
    #[serde(default, alias = "skill_match")]
    pub skill_match: Option<f64>,
    #[serde(default, alias = "experience_match")]
    pub experience_match: Option<f64>,
    #[serde(default, alias = "green_flags")]
    pub green_flags: Vec<String>,
    #[serde(default, alias = "yellow_flags")]
    pub yellow_flags: Vec<String>,
    #[serde(default, alias = "red_flags")]
    pub red_flags: Vec<String>,
    #[serde(default, alias = "bias_flags")]
    pub bias_flags: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl CandidateAnalysis {
    pub fn rating(&self) -> Option<MatchRating> {
        self.match_score.map(MatchRating::from_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchRating::Excellent
        } else if score >= 60.0 {
            MatchRating::Good
        } else if score >= 40.0 {
            MatchRating::Fair
        } else {
            MatchRating::Poor
        }
    }
}

impl fmt::Display for MatchRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchRating::Excellent => "Excellent",
            MatchRating::Good => "Good",
            MatchRating::Fair => "Fair",
            MatchRating::Poor => "Poor",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_payload() {
        let analysis: CandidateAnalysis = serde_json::from_str(
            r#"{"matchScore": 85, "greenFlags": ["Strong Python"], "recommendation": "Advance"}"#,
        )
        .unwrap();
        assert_eq!(analysis.match_score, Some(85.0));
        assert_eq!(analysis.green_flags, vec!["Strong Python"]);
        assert!(analysis.red_flags.is_empty());
        assert_eq!(analysis.recommendation.as_deref(), Some("Advance"));
    }

    #[test]
    fn test_snake_case_alias_accepted() {
        let analysis: CandidateAnalysis =
            serde_json::from_str(r#"{"skill_match": 70.5, "bias_flags": ["age"]}"#).unwrap();
        assert_eq!(analysis.skill_match, Some(70.5));
        assert_eq!(analysis.bias_flags, vec!["age"]);
    }

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(MatchRating::from_score(80.0), MatchRating::Excellent);
        assert_eq!(MatchRating::from_score(79.9), MatchRating::Good);
        assert_eq!(MatchRating::from_score(60.0), MatchRating::Good);
        assert_eq!(MatchRating::from_score(40.0), MatchRating::Fair);
        assert_eq!(MatchRating::from_score(39.0), MatchRating::Poor);
    }

    #[test]
    fn test_no_score_no_rating() {
        assert_eq!(CandidateAnalysis::default().rating(), None);
    }
}
