//! Deterministic rule-based analyzer.
//!
//! A pure keyword/score rule engine behind the `RiskAnalyzer` seam. It is
//! a stand-in for a real inference backend and carries no clinical
//! authority: red-flag symptoms force `High` outright, everything else is
//! scored from symptom count and context answers. First match wins, same
//! input always produces the same assessment.

use crate::catalog;
use crate::models::{AgeBand, IntakeSnapshot, Onset, RiskAssessment, RiskLevel, Severity};

use super::{AnalyzerError, RiskAnalyzer};

// ─── Red flags ───────────────────────────────────────────────────────────────

/// Catalog symptoms that force `High` regardless of anything else.
static RED_FLAG_SYMPTOMS: &[&str] = &["chest_pain", "shortness_of_breath"];

/// Free-text phrases that force `High` even when no red-flag symptom was
/// selected. Matched lowercase, containment only.
static RED_FLAG_PHRASES: &[&str] = &[
    "chest pain",
    "can't breathe",
    "cannot breathe",
    "trouble breathing",
    "difficulty breathing",
    "unconscious",
    "unresponsive",
    "passed out",
    "seizure",
    "severe bleeding",
];

/// Moderate threshold for the additive score.
const MODERATE_SCORE: u32 = 3;

// ─── Condition table ─────────────────────────────────────────────────────────

/// Informational condition names keyed by symptom combinations.
/// All listed ids must be present for the rule to fire.
struct ConditionRule {
    requires: &'static [&'static str],
    conditions: &'static [&'static str],
}

static CONDITION_RULES: &[ConditionRule] = &[
    ConditionRule {
        requires: &["chest_pain"],
        conditions: &["Cardiac or respiratory event — needs professional evaluation"],
    },
    ConditionRule {
        requires: &["shortness_of_breath"],
        conditions: &["Respiratory distress — needs professional evaluation"],
    },
    ConditionRule {
        requires: &["fever", "cough"],
        conditions: &[
            "Viral upper respiratory infection (Common cold)",
            "Seasonal flu",
        ],
    },
    ConditionRule {
        requires: &["fever", "sore_throat"],
        conditions: &["Pharyngitis", "Seasonal flu"],
    },
    ConditionRule {
        requires: &["nausea", "stomach_pain"],
        conditions: &["Gastroenteritis (stomach flu)"],
    },
    ConditionRule {
        requires: &["headache", "dizziness"],
        conditions: &["Dehydration", "Migraine"],
    },
    ConditionRule {
        requires: &["skin_rash"],
        conditions: &["Allergic reaction"],
    },
];

// ─── Analyzer ────────────────────────────────────────────────────────────────

/// The shipped deterministic analyzer. Stateless; safe to share.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleAnalyzer;

impl RiskAnalyzer for RuleAnalyzer {
    fn analyze(&self, snapshot: &IntakeSnapshot) -> Result<RiskAssessment, AnalyzerError> {
        let effective = effective_symptoms(snapshot);
        let level = classify(snapshot, &effective);
        Ok(RiskAssessment {
            level,
            possible_conditions: possible_conditions(&effective),
            immediate_actions: immediate_actions(level),
            escalation_criteria: escalation_criteria(level),
        })
    }
}

/// Selected symptoms plus catalog symptoms extracted from free text,
/// selection order first, duplicates removed.
fn effective_symptoms(snapshot: &IntakeSnapshot) -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = snapshot.symptoms.iter().map(|s| s.id).collect();
    for extracted in catalog::normalize(&snapshot.free_text) {
        if !ids.contains(&extracted.id) {
            ids.push(extracted.id);
        }
    }
    ids
}

fn classify(snapshot: &IntakeSnapshot, effective: &[&'static str]) -> RiskLevel {
    if effective.iter().any(|id| RED_FLAG_SYMPTOMS.contains(id)) {
        return RiskLevel::High;
    }
    let text = snapshot.free_text.to_lowercase();
    if RED_FLAG_PHRASES.iter().any(|p| text.contains(p)) {
        return RiskLevel::High;
    }

    let mut score = effective.len() as u32;
    score += match snapshot.context.severity {
        Some(Severity::Severe) => 3,
        Some(Severity::Moderate) => 1,
        _ => 0,
    };
    if snapshot.context.onset == Some(Onset::OverAWeek) {
        score += 1;
    }
    if matches!(
        snapshot.context.age_band,
        Some(AgeBand::Under18) | Some(AgeBand::Over60)
    ) {
        score += 1;
    }

    if score >= MODERATE_SCORE {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

fn possible_conditions(effective: &[&'static str]) -> Vec<String> {
    let mut conditions: Vec<String> = Vec::new();
    for rule in CONDITION_RULES {
        if rule.requires.iter().all(|id| effective.contains(id)) {
            for c in rule.conditions {
                if !conditions.iter().any(|existing| existing == c) {
                    conditions.push((*c).to_string());
                }
            }
        }
    }
    if conditions.is_empty() {
        conditions.push("No specific condition matched — general viral illness possible".into());
    }
    conditions
}

fn immediate_actions(level: RiskLevel) -> Vec<String> {
    let actions: &[&str] = match level {
        RiskLevel::Low => &["Rest and stay hydrated", "Monitor your symptoms for changes"],
        RiskLevel::Moderate => &[
            "Rest and stay hydrated",
            "Monitor temperature",
            "Use over-the-counter fever reducers if needed",
        ],
        RiskLevel::High => &[
            "Call emergency services or have someone take you to the nearest emergency department",
            "Do not drive yourself if symptoms are severe",
        ],
    };
    actions.iter().map(|a| (*a).to_string()).collect()
}

fn escalation_criteria(level: RiskLevel) -> Vec<String> {
    let mut criteria = vec![
        "Symptoms worsen after 3-5 days".to_string(),
        "Fever above 103°F (39.4°C)".to_string(),
        "Difficulty breathing".to_string(),
    ];
    if level == RiskLevel::High {
        criteria.insert(0, "Any loss of consciousness or worsening chest pain".to_string());
    }
    criteria
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContextAnswers, ContextKey};

    fn snapshot(ids: &[&str], free_text: &str, context: ContextAnswers) -> IntakeSnapshot {
        IntakeSnapshot {
            symptoms: ids.iter().map(|id| *catalog::find(id).unwrap()).collect(),
            free_text: free_text.into(),
            context,
        }
    }

    // ── Red flags ───────────────────────────────────────────

    #[test]
    fn chest_pain_selection_forces_high() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&["chest_pain"], "", ContextAnswers::default()))
            .unwrap();
        assert_eq!(result.level, RiskLevel::High);
        assert!(result.possible_conditions[0].contains("Cardiac"));
    }

    #[test]
    fn red_flag_phrase_in_free_text_forces_high() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&[], "I woke up and I can't breathe properly", ContextAnswers::default()))
            .unwrap();
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn high_level_prepends_escalation_call_to_action() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&["chest_pain"], "", ContextAnswers::default()))
            .unwrap();
        assert!(result.escalation_criteria[0].contains("loss of consciousness"));
    }

    // ── Scoring ─────────────────────────────────────────────

    #[test]
    fn single_mild_symptom_is_low() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&["headache"], "", ContextAnswers::default()))
            .unwrap();
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn three_symptoms_reach_moderate() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&["fever", "cough", "fatigue"], "", ContextAnswers::default()))
            .unwrap();
        assert_eq!(result.level, RiskLevel::Moderate);
        assert!(result
            .possible_conditions
            .iter()
            .any(|c| c.contains("Common cold")));
    }

    #[test]
    fn severe_answer_raises_single_symptom_to_moderate() {
        let mut context = ContextAnswers::default();
        context.set(ContextKey::Severity, "severe").unwrap();
        let result = RuleAnalyzer
            .analyze(&snapshot(&["back_pain"], "", context))
            .unwrap();
        assert_eq!(result.level, RiskLevel::Moderate);
    }

    #[test]
    fn vulnerable_age_band_counts_toward_score() {
        let mut context = ContextAnswers::default();
        context.set(ContextKey::AgeBand, "over_60").unwrap();
        context.set(ContextKey::Onset, "over_a_week").unwrap();
        let result = RuleAnalyzer
            .analyze(&snapshot(&["fatigue"], "", context))
            .unwrap();
        // 1 symptom + lingering onset + vulnerable age = 3.
        assert_eq!(result.level, RiskLevel::Moderate);
    }

    // ── Free-text folding ───────────────────────────────────

    #[test]
    fn free_text_symptoms_fold_into_the_effective_set() {
        let result = RuleAnalyzer
            .analyze(&snapshot(
                &["fever"],
                "bad cough and my whole body aches",
                ContextAnswers::default(),
            ))
            .unwrap();
        // fever + extracted cough + muscle aches = 3 symptoms.
        assert_eq!(result.level, RiskLevel::Moderate);
        assert!(result
            .possible_conditions
            .iter()
            .any(|c| c.contains("Seasonal flu")));
    }

    #[test]
    fn unrecognized_free_text_still_classifies() {
        let result = RuleAnalyzer
            .analyze(&snapshot(&[], "just feel a bit off", ContextAnswers::default()))
            .unwrap();
        assert_eq!(result.level, RiskLevel::Low);
        assert_eq!(result.possible_conditions.len(), 1);
    }

    // ── Determinism ─────────────────────────────────────────

    #[test]
    fn same_snapshot_always_produces_same_assessment() {
        let snap = snapshot(&["fever", "cough"], "since yesterday", ContextAnswers::default());
        let a = RuleAnalyzer.analyze(&snap).unwrap();
        let b = RuleAnalyzer.analyze(&snap).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_assessment_has_actions_and_criteria() {
        for ids in [&["headache"][..], &["fever", "cough", "nausea"][..], &["chest_pain"][..]] {
            let result = RuleAnalyzer
                .analyze(&snapshot(ids, "", ContextAnswers::default()))
                .unwrap();
            assert!(!result.immediate_actions.is_empty());
            assert!(!result.escalation_criteria.is_empty());
            assert!(!result.possible_conditions.is_empty());
        }
    }
}
