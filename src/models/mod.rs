//! Data model for one triage run: context questions, the intake session,
//! and the risk assessment produced by analysis.

pub mod assessment;
pub mod context;
pub mod session;

pub use assessment::{IntakeSnapshot, RiskAssessment, RiskLevel};
pub use context::{AgeBand, ContextAnswers, ContextKey, Gender, Onset, Severity};
pub use session::{IntakeSession, SessionStatus};
