//! Structured output of the research evaluator and the loop escalation rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::Result;

/// Evaluation result for a round of research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Research is sufficient
    Pass,
    /// Research needs another round
    Fail,
}

/// A targeted follow-up web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search_query: String,
}

/// Evaluator feedback on research quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub grade: Grade,
    pub comment: String,
    /// Queries to close research gaps; empty or absent on a pass
    #[serde(default)]
    pub follow_up_queries: Option<Vec<SearchQuery>>,
}

impl Feedback {
    /// Parse the evaluator's raw JSON output.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn passed(&self) -> bool {
        self.grade == Grade::Pass
    }

    pub fn queries(&self) -> &[SearchQuery] {
        self.follow_up_queries.as_deref().unwrap_or_default()
    }
}

/// Stops the refinement loop once the evaluator grades the research a pass.
#[derive(Debug, Clone)]
pub struct EscalationChecker {
    name: String,
}

impl EscalationChecker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether to escalate given the latest evaluation stored in session state.
    ///
    /// Only the `grade` field is consulted, so partial evaluations still count.
    pub fn should_escalate(&self, evaluation: Option<&Value>) -> bool {
        let grade = evaluation
            .and_then(|e| e.get("grade"))
            .and_then(|g| Grade::deserialize(g).ok());

        if grade == Some(Grade::Pass) {
            info!(
                checker = %self.name,
                "Research evaluation passed. Escalating to stop loop."
            );
            true
        } else {
            info!(
                checker = %self.name,
                "Research evaluation failed or not found. Loop will continue."
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_failing_feedback() {
        let raw = r#"{
            "grade": "fail",
            "comment": "Coverage of pricing is thin.",
            "follow_up_queries": [
                {"search_query": "luxury map subscription pricing 2025"},
                {"search_query": "luxmap competitor feature comparison"}
            ]
        }"#;

        let feedback = Feedback::from_json(raw).unwrap();
        assert_eq!(feedback.grade, Grade::Fail);
        assert!(!feedback.passed());
        assert_eq!(feedback.queries().len(), 2);
        assert_eq!(
            feedback.queries()[0].search_query,
            "luxury map subscription pricing 2025"
        );
    }

    #[test]
    fn test_parse_passing_feedback_without_queries() {
        let feedback =
            Feedback::from_json(r#"{"grade": "pass", "comment": "Thorough."}"#).unwrap();
        assert!(feedback.passed());
        assert_eq!(feedback.follow_up_queries, None);
        assert!(feedback.queries().is_empty());
    }

    #[test]
    fn test_unknown_grade_rejected() {
        let err = Feedback::from_json(r#"{"grade": "maybe", "comment": ""}"#).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidOutput(_)));
    }

    #[test]
    fn test_escalates_only_on_pass() {
        let checker = EscalationChecker::new("escalation_checker");
        assert_eq!(checker.name(), "escalation_checker");

        let passed = json!({"grade": "pass", "comment": "ok"});
        let partial = json!({"grade": "pass"});
        let failed = json!({"grade": "fail", "comment": "gaps"});
        let ungraded = json!({"comment": "no grade"});
        let bare = json!("pass");

        assert!(checker.should_escalate(Some(&passed)));
        assert!(checker.should_escalate(Some(&partial)));
        assert!(!checker.should_escalate(Some(&failed)));
        assert!(!checker.should_escalate(Some(&ungraded)));
        assert!(!checker.should_escalate(Some(&bare)));
        assert!(!checker.should_escalate(None));
    }

    #[test]
    fn test_feedback_serializes_lowercase_grade() {
        let feedback = Feedback {
            grade: Grade::Pass,
            comment: "Thorough.".to_string(),
            follow_up_queries: None,
        };
        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["grade"], "pass");

        let checker = EscalationChecker::new("escalation_checker");
        assert!(checker.should_escalate(Some(&value)));
    }
}
