//! Result presentation — pure mapping from an assessment to a display
//! treatment and downstream referral intents.
//!
//! The host owns widgets, colors, and routing; this module only decides
//! tone, labels, and which actions to offer. Total over `RiskLevel`,
//! side-effect-free.

use serde::{Deserialize, Serialize};

use crate::models::{RiskAssessment, RiskLevel};

/// Visual register the host should render the result in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTone {
    Informational,
    Warning,
    Emergency,
}

impl DisplayTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Warning => "warning",
            Self::Emergency => "emergency",
        }
    }
}

/// Opaque referral intents for the host to route. The core does not know
/// what the destinations do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralAction {
    /// Open the consultation flow.
    ConsultDoctor,
    /// Open the pharmacy flow.
    FindMedicines,
    /// Immediate escalation (emergency call).
    EmergencyCall,
}

/// Display treatment for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskPresentation {
    pub tone: DisplayTone,
    pub headline: &'static str,
    /// Attention badge, when the level warrants one.
    pub badge: Option<&'static str>,
    /// Whether the escalation criteria deserve their own call-to-action.
    pub surface_escalation: bool,
    /// Offered in order; the host renders them as-is.
    pub actions: Vec<ReferralAction>,
}

/// Map an assessment to its display treatment.
pub fn present(assessment: &RiskAssessment) -> RiskPresentation {
    let (tone, headline, badge) = match assessment.level {
        RiskLevel::Low => (DisplayTone::Informational, "Low Risk Level", None),
        RiskLevel::Moderate => (
            DisplayTone::Warning,
            "Moderate Risk Level",
            Some("Requires Attention"),
        ),
        RiskLevel::High => (
            DisplayTone::Emergency,
            "High Risk Level",
            Some("Seek Care Now"),
        ),
    };

    // Consultation and pharmacy referrals are always offered; an
    // emergency-tone result surfaces the escalation action first.
    let mut actions = vec![ReferralAction::ConsultDoctor, ReferralAction::FindMedicines];
    if tone == DisplayTone::Emergency {
        actions.insert(0, ReferralAction::EmergencyCall);
    }

    RiskPresentation {
        tone,
        headline,
        badge,
        surface_escalation: tone == DisplayTone::Emergency,
        actions,
    }
}
