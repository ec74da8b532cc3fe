//! Triage wizard state machine + async analysis driver.
//!
//! `TriageFlow` owns exactly one intake session and validates every
//! transition: guarded forward motion, unrestricted (non-destructive)
//! backward motion, and a ticketed analysis lifecycle. The analysis is the
//! only suspending operation in the core — `start_analysis` returns
//! immediately with a frozen snapshot and a generation ticket, and the
//! transition to `Completed` / `Failed` happens later when the outcome is
//! delivered. A cancel or reset bumps the generation, so a late outcome
//! for a superseded run is discarded without touching the session.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::analyzer::{AnalyzerError, RiskAnalyzer};
use crate::error::{Guard, TriageError};
use crate::models::{
    ContextKey, IntakeSession, IntakeSnapshot, RiskAssessment, SessionStatus,
};

/// Bounded wait imposed on every analyzer invocation by `run_analysis`.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(20);

// ─── Tickets ─────────────────────────────────────────────────────────────────

/// Identifies one analysis run. An outcome is applied only if its ticket
/// still matches the flow's current session and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisTicket {
    session: Uuid,
    generation: u64,
}

/// Everything the driver needs to execute one analysis: the frozen input
/// and the ticket to deliver the outcome under.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticket: AnalysisTicket,
    pub snapshot: IntakeSnapshot,
}

/// What `advance` did.
#[derive(Debug)]
pub enum Advanced {
    /// Moved to the next wizard step.
    Step(SessionStatus),
    /// Entered `Analyzing`; hand the request to the analysis driver.
    AnalysisStarted(AnalysisRequest),
}

/// How a delivered outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Completed,
    Failed,
    /// The ticket no longer matches (cancelled, reset, or already
    /// resolved); the outcome was discarded with no session mutation.
    Stale,
}

// ─── Flow ────────────────────────────────────────────────────────────────────

/// The wizard state machine. One per session; never shared between
/// callers.
#[derive(Debug)]
pub struct TriageFlow {
    session: IntakeSession,
    /// Bumped on cancel and reset; invalidates outstanding tickets.
    generation: u64,
}

impl Default for TriageFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageFlow {
    /// Fresh flow with a brand-new session in `Collecting`.
    pub fn new() -> Self {
        let session = IntakeSession::new();
        tracing::info!(session = %session.id(), "triage session created");
        Self { session, generation: 0 }
    }

    pub fn session(&self) -> &IntakeSession {
        &self.session
    }

    /// The wizard step the host should render right now.
    pub fn current_step(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn can_advance(&self) -> bool {
        match self.session.status() {
            SessionStatus::Collecting => self.session.has_reportable_input(),
            SessionStatus::AwaitingContext | SessionStatus::ReadyToAnalyze => true,
            SessionStatus::Analyzing | SessionStatus::Completed | SessionStatus::Failed => false,
        }
    }

    pub fn can_retreat(&self) -> bool {
        !matches!(
            self.session.status(),
            SessionStatus::Collecting | SessionStatus::Analyzing
        )
    }

    // ── Session mutations (rejected while analysis is in flight) ──

    /// Toggle a symptom's membership in the selection.
    pub fn toggle_symptom(&mut self, id: &str) -> Result<(), TriageError> {
        self.ensure_editable()?;
        self.session.toggle_symptom(id);
        Ok(())
    }

    /// Replace the free-text description verbatim.
    pub fn set_free_text(&mut self, text: &str) -> Result<(), TriageError> {
        self.ensure_editable()?;
        self.session.set_free_text(text);
        Ok(())
    }

    /// Answer one context question; out-of-domain values are rejected
    /// with no write.
    pub fn set_context(&mut self, key: ContextKey, raw: &str) -> Result<(), TriageError> {
        self.ensure_editable()?;
        self.session.set_context(key, raw)
    }

    fn ensure_editable(&self) -> Result<(), TriageError> {
        if self.session.status() == SessionStatus::Analyzing {
            tracing::warn!(session = %self.session.id(), "edit rejected while analysis in flight");
            return Err(TriageError::guard(Guard::AnalysisInFlight));
        }
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────

    /// Guarded forward motion. A refused advance mutates nothing.
    pub fn advance(&mut self) -> Result<Advanced, TriageError> {
        match self.session.status() {
            SessionStatus::Collecting => {
                if !self.session.has_reportable_input() {
                    tracing::warn!(session = %self.session.id(), "advance refused: nothing reported yet");
                    return Err(TriageError::guard(Guard::NoReportableInput));
                }
                Ok(Advanced::Step(self.transition(SessionStatus::AwaitingContext)))
            }
            // All context questions are optional.
            SessionStatus::AwaitingContext => {
                Ok(Advanced::Step(self.transition(SessionStatus::ReadyToAnalyze)))
            }
            SessionStatus::ReadyToAnalyze => {
                Ok(Advanced::AnalysisStarted(self.start_analysis()?))
            }
            SessionStatus::Analyzing => Err(TriageError::AlreadyInProgress),
            SessionStatus::Completed | SessionStatus::Failed => {
                Err(TriageError::guard(Guard::RunFinished))
            }
        }
    }

    /// Backward motion. Never discards data entered for earlier steps.
    /// From `Collecting` there is no earlier step — a no-op. While
    /// `Analyzing` navigation is refused; cancel the analysis instead.
    pub fn retreat(&mut self) -> Result<SessionStatus, TriageError> {
        match self.session.status() {
            SessionStatus::Collecting => Ok(SessionStatus::Collecting),
            SessionStatus::AwaitingContext => Ok(self.transition(SessionStatus::Collecting)),
            SessionStatus::ReadyToAnalyze => Ok(self.transition(SessionStatus::AwaitingContext)),
            SessionStatus::Analyzing => Err(TriageError::guard(Guard::AnalysisInFlight)),
            // Result is retained until a new completed run overwrites it.
            SessionStatus::Completed | SessionStatus::Failed => {
                Ok(self.transition(SessionStatus::ReadyToAnalyze))
            }
        }
    }

    // ── Analysis lifecycle ──────────────────────────────────

    /// Freeze a snapshot, enter `Analyzing`, and issue the ticket for this
    /// run. Only one analysis may be outstanding per session.
    pub fn start_analysis(&mut self) -> Result<AnalysisRequest, TriageError> {
        match self.session.status() {
            SessionStatus::Analyzing => Err(TriageError::AlreadyInProgress),
            SessionStatus::ReadyToAnalyze => {
                let snapshot = self.session.snapshot();
                let ticket = AnalysisTicket {
                    session: self.session.id(),
                    generation: self.generation,
                };
                self.transition(SessionStatus::Analyzing);
                tracing::info!(
                    session = %self.session.id(),
                    symptoms = snapshot.symptoms.len(),
                    "analysis started"
                );
                Ok(AnalysisRequest { ticket, snapshot })
            }
            _ => Err(TriageError::guard(Guard::NotReadyToAnalyze)),
        }
    }

    /// Apply an analysis outcome. Stale tickets (cancelled, reset, or
    /// already resolved runs) are discarded with no observable mutation.
    pub fn deliver_outcome(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<RiskAssessment, AnalyzerError>,
    ) -> Delivery {
        let live = ticket.session == self.session.id()
            && ticket.generation == self.generation
            && self.session.status() == SessionStatus::Analyzing;
        if !live {
            tracing::debug!(session = %ticket.session, "discarding stale analysis outcome");
            return Delivery::Stale;
        }
        match outcome {
            Ok(assessment) => {
                tracing::info!(
                    session = %self.session.id(),
                    level = assessment.level.as_str(),
                    "analysis completed"
                );
                self.session.attach_result(assessment);
                Delivery::Completed
            }
            Err(failure) => {
                tracing::warn!(session = %self.session.id(), error = %failure, "analysis failed");
                self.session.record_failure(failure);
                Delivery::Failed
            }
        }
    }

    /// Cancel an in-flight analysis and return to `ReadyToAnalyze`. The
    /// outstanding ticket is invalidated, so the eventual outcome (if any)
    /// becomes a stale no-op. Outside `Analyzing` this does nothing.
    pub fn cancel_analysis(&mut self) -> SessionStatus {
        if self.session.status() == SessionStatus::Analyzing {
            self.generation += 1;
            tracing::info!(session = %self.session.id(), "analysis cancelled");
            return self.transition(SessionStatus::ReadyToAnalyze);
        }
        self.session.status()
    }

    /// Discard the session entirely and start a fresh one. Any in-flight
    /// analysis outcome is invalidated.
    pub fn reset(&mut self) {
        self.generation += 1;
        let old = self.session.id();
        self.session = IntakeSession::new();
        tracing::info!(old_session = %old, session = %self.session.id(), "triage flow reset");
    }

    fn transition(&mut self, to: SessionStatus) -> SessionStatus {
        let from = self.session.status();
        self.session.set_status(to);
        tracing::info!(session = %self.session.id(), %from, %to, "wizard step changed");
        to
    }
}

// ─── Async driver ────────────────────────────────────────────────────────────

/// Execute an already-issued analysis request off the event loop and
/// deliver its outcome.
///
/// The analyzer runs on a blocking worker; the wait is bounded by `limit`
/// and expiry is delivered as `AnalyzerError::Timeout`. If the run was
/// cancelled or the flow reset in the meantime, the delivery is a stale
/// no-op and the current step is returned unchanged.
pub async fn resolve_analysis(
    flow: &mut TriageFlow,
    request: AnalysisRequest,
    analyzer: Arc<dyn RiskAnalyzer>,
    limit: Duration,
) -> SessionStatus {
    let AnalysisRequest { ticket, snapshot } = request;
    let work = tokio::task::spawn_blocking(move || analyzer.analyze(&snapshot));
    let outcome = match tokio::time::timeout(limit, work).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join)) => Err(AnalyzerError::Unavailable(join.to_string())),
        Err(_elapsed) => Err(AnalyzerError::Timeout {
            after_secs: limit.as_millis().div_ceil(1000) as u64,
        }),
    };
    flow.deliver_outcome(ticket, outcome);
    flow.current_step()
}

/// Start and resolve one analysis: the convenience path for hosts that do
/// not need to interleave anything between start and outcome.
pub async fn run_analysis(
    flow: &mut TriageFlow,
    analyzer: Arc<dyn RiskAnalyzer>,
    limit: Duration,
) -> Result<SessionStatus, TriageError> {
    let request = flow.start_analysis()?;
    Ok(resolve_analysis(flow, request, analyzer, limit).await)
}
