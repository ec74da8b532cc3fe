//! Symptom intake & risk triage core for the Arogya telehealth app.
//!
//! The host UI (wizard screens, navigation, call flows) renders nothing from
//! this crate directly — it drives a [`flow::TriageFlow`] through
//! `current_step` / `can_advance` / `advance` / `retreat`, supplies a
//! [`analyzer::RiskAnalyzer`] implementation, and maps the resulting
//! [`presenter::RiskPresentation`] onto its own widgets.
//!
//! No persistence, no network surface, no rendering lives here.

pub mod analyzer; // Risk analyzer contract + deterministic rule engine
pub mod catalog; // Static symptom catalog + free-text normalization
pub mod error;
pub mod flow; // Wizard state machine + async analysis driver
pub mod models;
pub mod presenter; // Risk level → display treatment + referral intents

pub use analyzer::{AnalyzerError, RiskAnalyzer, RuleAnalyzer};
pub use catalog::Symptom;
pub use error::{Guard, TriageError};
pub use flow::{
    resolve_analysis, run_analysis, Advanced, AnalysisRequest, AnalysisTicket, Delivery,
    TriageFlow, DEFAULT_ANALYSIS_TIMEOUT,
};
pub use models::{
    AgeBand, ContextAnswers, ContextKey, Gender, IntakeSession, IntakeSnapshot, Onset,
    RiskAssessment, RiskLevel, SessionStatus, Severity,
};
pub use presenter::{present, DisplayTone, ReferralAction, RiskPresentation};
