//! Risk analyzer contract.
//!
//! The analyzer is a black-box external collaborator: rule engine, local
//! model inference, or a remote call — the core only knows this seam. The
//! flow module owns orchestration (snapshot capture, single-outstanding-
//! request guard, timeout, cancellation); implementations here only turn a
//! frozen snapshot into an assessment.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::models::{IntakeSnapshot, RiskAssessment};

pub use rules::RuleAnalyzer;

/// Why an analysis run failed. Never fatal: every variant lands the
/// session in `Failed` with retry available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AnalyzerError {
    /// The bounded wait expired before the analyzer answered.
    #[error("analysis timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// The analyzer could not be reached or did not run.
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    /// The analyzer answered with something the core could not use.
    #[error("analyzer returned a malformed response: {0}")]
    Malformed(String),
}

/// Turns a frozen intake snapshot into a risk assessment.
///
/// Implementations must not hold references into the live session — they
/// only ever see the snapshot — and should be side-effect-free from the
/// core's point of view.
pub trait RiskAnalyzer: Send + Sync {
    fn analyze(&self, snapshot: &IntakeSnapshot) -> Result<RiskAssessment, AnalyzerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_their_reason() {
        let err = AnalyzerError::Timeout { after_secs: 20 };
        assert_eq!(err.to_string(), "analysis timed out after 20s");

        let err = AnalyzerError::Unavailable("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn errors_serialize_with_stable_kind_tags() {
        let json = serde_json::to_value(AnalyzerError::Timeout { after_secs: 5 }).unwrap();
        assert_eq!(json["kind"], "timeout");

        let json = serde_json::to_value(AnalyzerError::Malformed("not json".into())).unwrap();
        assert_eq!(json["kind"], "malformed");
        assert_eq!(json["detail"], "not json");
    }
}
