//! The intake session — mutable state of one run through the wizard.
//!
//! A session is owned by exactly one wizard instance and mutated only
//! through state-machine-validated calls (see the flow module); the
//! mutators here are therefore crate-private. Nothing is persisted across
//! sessions.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::AnalyzerError;
use crate::catalog::{self, Symptom};
use crate::error::TriageError;
use crate::models::{ContextAnswers, ContextKey, RiskAssessment};

/// Lifecycle status of a session. Doubles as the wizard step the host
/// should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Collecting,
    AwaitingContext,
    ReadyToAnalyze,
    Analyzing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::AwaitingContext => "awaiting_context",
            Self::ReadyToAnalyze => "ready_to_analyze",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Terminal for this run; only backward navigation or reset leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-progress or completed triage attempt.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSession {
    id: Uuid,
    created_at: NaiveDateTime,
    status: SessionStatus,
    free_text: String,
    /// Selected symptom ids, unique, in selection order.
    selected: Vec<&'static str>,
    context: ContextAnswers,
    /// Last completed assessment. Retained across later failures and
    /// backward navigation; cleared only by reset.
    result: Option<RiskAssessment>,
    /// Reason the most recent analysis failed, for display with the retry
    /// action. Cleared on the next completed run.
    last_failure: Option<AnalyzerError>,
}

impl IntakeSession {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Local::now().naive_local(),
            status: SessionStatus::Collecting,
            free_text: String::new(),
            selected: Vec::new(),
            context: ContextAnswers::default(),
            result: None,
            last_failure: None,
        }
    }

    // ── Read surface ────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Selected symptom ids in selection order.
    pub fn selected_ids(&self) -> &[&'static str] {
        &self.selected
    }

    /// Selected symptoms resolved against the catalog, in selection order.
    pub fn selected_symptoms(&self) -> Vec<&'static Symptom> {
        self.selected.iter().filter_map(|id| catalog::find(id)).collect()
    }

    pub fn context(&self) -> &ContextAnswers {
        &self.context
    }

    pub fn result(&self) -> Option<&RiskAssessment> {
        self.result.as_ref()
    }

    pub fn last_failure(&self) -> Option<&AnalyzerError> {
        self.last_failure.as_ref()
    }

    /// Whether there is anything to analyze: at least one selected symptom,
    /// or free text that is non-whitespace after trimming.
    pub fn has_reportable_input(&self) -> bool {
        !self.selected.is_empty() || !self.free_text.trim().is_empty()
    }

    /// Freeze the current input for an analysis run. The copy is
    /// unaffected by any mutation attempted afterward.
    pub fn snapshot(&self) -> crate::models::IntakeSnapshot {
        crate::models::IntakeSnapshot {
            symptoms: self.selected_symptoms().into_iter().copied().collect(),
            free_text: self.free_text.clone(),
            context: self.context.clone(),
        }
    }

    // ── Crate-private mutators (flow-validated) ─────────────

    /// Add the id if absent, remove it if present. Removing and re-adding
    /// moves the symptom to the end of selection order. Ids not in the
    /// catalog are ignored.
    pub(crate) fn toggle_symptom(&mut self, id: &str) {
        let Some(symptom) = catalog::find(id) else {
            tracing::warn!(symptom = id, "ignoring toggle for unknown symptom id");
            return;
        };
        match self.selected.iter().position(|s| *s == symptom.id) {
            Some(pos) => {
                self.selected.remove(pos);
                tracing::debug!(session = %self.id, symptom = symptom.id, "symptom deselected");
            }
            None => {
                self.selected.push(symptom.id);
                tracing::debug!(session = %self.id, symptom = symptom.id, "symptom selected");
            }
        }
    }

    /// Replace the free-text description verbatim. No trimming at write
    /// time; trimming happens only in `has_reportable_input`.
    pub(crate) fn set_free_text(&mut self, text: &str) {
        self.free_text = text.to_string();
    }

    pub(crate) fn set_context(&mut self, key: ContextKey, raw: &str) -> Result<(), TriageError> {
        self.context.set(key, raw)
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub(crate) fn attach_result(&mut self, assessment: RiskAssessment) {
        self.result = Some(assessment);
        self.last_failure = None;
        self.status = SessionStatus::Completed;
    }

    pub(crate) fn record_failure(&mut self, failure: AnalyzerError) {
        // Prior completed result is deliberately retained.
        self.last_failure = Some(failure);
        self.status = SessionStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Symptom toggling ────────────────────────────────────

    #[test]
    fn toggle_adds_then_removes() {
        let mut session = IntakeSession::new();
        session.toggle_symptom("fever");
        assert_eq!(session.selected_ids(), ["fever"]);
        session.toggle_symptom("fever");
        assert!(session.selected_ids().is_empty());
    }

    #[test]
    fn even_number_of_toggles_is_identity() {
        let mut session = IntakeSession::new();
        session.toggle_symptom("cough");
        let before = session.selected_ids().to_vec();
        for _ in 0..4 {
            session.toggle_symptom("headache");
        }
        assert_eq!(session.selected_ids(), before.as_slice());
    }

    #[test]
    fn readding_moves_to_end_of_selection_order() {
        let mut session = IntakeSession::new();
        session.toggle_symptom("fever");
        session.toggle_symptom("cough");
        session.toggle_symptom("fever"); // remove
        session.toggle_symptom("fever"); // re-add
        assert_eq!(session.selected_ids(), ["cough", "fever"]);
    }

    #[test]
    fn unknown_symptom_id_is_ignored() {
        let mut session = IntakeSession::new();
        session.toggle_symptom("spontaneous_combustion");
        assert!(session.selected_ids().is_empty());
    }

    // ── Reportable input ────────────────────────────────────

    #[test]
    fn whitespace_free_text_is_not_reportable() {
        let mut session = IntakeSession::new();
        session.set_free_text("   \n\t ");
        assert!(!session.has_reportable_input());
        session.set_free_text("  mild headache ");
        assert!(session.has_reportable_input());
    }

    #[test]
    fn free_text_stored_verbatim() {
        let mut session = IntakeSession::new();
        session.set_free_text("  feeling off since tuesday  ");
        assert_eq!(session.free_text(), "  feeling off since tuesday  ");
    }

    // ── Result lifecycle ────────────────────────────────────

    #[test]
    fn failure_after_completed_retains_result() {
        let mut session = IntakeSession::new();
        session.attach_result(RiskAssessment {
            level: crate::models::RiskLevel::Low,
            possible_conditions: vec!["Common cold".into()],
            immediate_actions: vec![],
            escalation_criteria: vec![],
        });
        assert_eq!(session.status(), SessionStatus::Completed);

        session.record_failure(AnalyzerError::Unavailable("engine offline".into()));
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(session.result().is_some(), "prior result must survive a failed retry");
        assert!(session.last_failure().is_some());
    }

    #[test]
    fn completed_run_clears_previous_failure() {
        let mut session = IntakeSession::new();
        session.record_failure(AnalyzerError::Timeout { after_secs: 20 });
        session.attach_result(RiskAssessment {
            level: crate::models::RiskLevel::Moderate,
            possible_conditions: vec![],
            immediate_actions: vec![],
            escalation_criteria: vec![],
        });
        assert!(session.last_failure().is_none());
        assert_eq!(session.status(), SessionStatus::Completed);
    }
}
