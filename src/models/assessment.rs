//! Analysis output types and the immutable intake snapshot.

use serde::{Deserialize, Serialize};

use crate::catalog::Symptom;
use crate::models::ContextAnswers;

/// Risk classification, ordered: `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Output of one analysis run. Owned by the session that produced it and
/// never mutated after creation.
///
/// `possible_conditions` is informational, not a diagnostic ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub possible_conditions: Vec<String>,
    pub immediate_actions: Vec<String>,
    pub escalation_criteria: Vec<String>,
}

/// Immutable copy of session input, frozen the moment analysis begins.
///
/// Insulates the in-flight analyzer call from any later edits to the live
/// session: the analyzer only ever sees this.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    /// Selected symptoms resolved against the catalog, in selection order.
    pub symptoms: Vec<Symptom>,
    pub free_text: String,
    pub context: ContextAnswers,
}

impl IntakeSnapshot {
    /// Symptom identifiers in selection order.
    pub fn symptom_ids(&self) -> Vec<&'static str> {
        self.symptoms.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
    }

    #[test]
    fn risk_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Moderate).unwrap(),
            "\"moderate\""
        );
    }

    #[test]
    fn snapshot_serializes_for_host_display() {
        let snapshot = IntakeSnapshot {
            symptoms: vec![*catalog::find("fever").unwrap()],
            free_text: "since yesterday".into(),
            context: ContextAnswers::default(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["symptoms"][0]["id"], "fever");
        assert_eq!(json["symptoms"][0]["label"], "Fever");
        // Match keywords are internal; they must not leak to the host.
        assert!(json["symptoms"][0].get("keywords").is_none());
    }
}
