//! Error types for the triage core.
//!
//! Nothing here is process-fatal: every failure is either rejected as a
//! no-op (`InvalidContextValue`, `GuardViolation`, `AlreadyInProgress`) or
//! lands the session in `Failed`, from which retry is always available
//! (see `AnalyzerError` in the analyzer module).

use serde::{Deserialize, Serialize};

use crate::models::ContextKey;

/// A named precondition that blocked a transition or mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// Advancing past `Collecting` requires at least one selected symptom
    /// or non-whitespace free text.
    NoReportableInput,
    /// The session is `Analyzing`; edits and backward navigation are
    /// refused until the outcome arrives or the analysis is cancelled.
    AnalysisInFlight,
    /// `Completed` / `Failed` are terminal for the run; only backward
    /// navigation (or reset) leaves them.
    RunFinished,
    /// Analysis can only be started from `ReadyToAnalyze`.
    NotReadyToAnalyze,
}

impl Guard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoReportableInput => "no_reportable_input",
            Self::AnalysisInFlight => "analysis_in_flight",
            Self::RunFinished => "run_finished",
            Self::NotReadyToAnalyze => "not_ready_to_analyze",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::NoReportableInput => "select a symptom or describe how you feel first",
            Self::AnalysisInFlight => "analysis is in flight; wait, or cancel it",
            Self::RunFinished => "this run is finished; go back or start over",
            Self::NotReadyToAnalyze => "the session is not at the analyze step",
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Errors surfaced by session mutations and state-machine transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    /// The raw value is outside the enum domain for this context question.
    /// Rejected before any write; session state unchanged.
    #[error("\"{value}\" is not a valid answer for {key}")]
    InvalidContextValue { key: ContextKey, value: String },

    /// "Cannot advance yet" — the named precondition is unmet.
    /// Session state unchanged.
    #[error("cannot advance yet: {guard}")]
    GuardViolation { guard: Guard },

    /// An analysis is already outstanding for this session; no second
    /// request was started.
    #[error("an analysis is already running for this session")]
    AlreadyInProgress,
}

impl TriageError {
    pub(crate) fn guard(guard: Guard) -> Self {
        Self::GuardViolation { guard }
    }
}
