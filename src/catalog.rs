//! Static symptom catalog + free-text normalization.
//!
//! The catalog is fixed at process start; its order is display order, not a
//! clinical ranking. `normalize` is a pure best-effort extractor: it maps
//! free text onto catalog entries via per-symptom keyword lists and returns
//! an empty set (never an error) for unrecognized text.

use serde::Serialize;

/// One catalog entry: stable identifier + canonical display label.
///
/// Keywords are used only by [`normalize`]; they are not part of the
/// host-facing shape.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Symptom {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    keywords: &'static [&'static str],
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

const CATALOG: &[Symptom] = &[
    Symptom {
        id: "fever",
        label: "Fever",
        keywords: &["fever", "temperature", "burning up", "febrile"],
    },
    Symptom {
        id: "headache",
        label: "Headache",
        keywords: &["headache", "head ache", "migraine"],
    },
    Symptom {
        id: "cough",
        label: "Cough",
        keywords: &["cough", "coughing"],
    },
    Symptom {
        id: "sore_throat",
        label: "Sore throat",
        keywords: &["sore throat", "throat pain", "scratchy throat"],
    },
    Symptom {
        id: "fatigue",
        label: "Fatigue",
        keywords: &["fatigue", "tired", "exhausted", "no energy"],
    },
    Symptom {
        id: "nausea",
        label: "Nausea",
        keywords: &["nausea", "nauseous", "queasy", "vomit"],
    },
    Symptom {
        id: "stomach_pain",
        label: "Stomach pain",
        keywords: &["stomach pain", "stomach ache", "abdominal pain", "belly pain"],
    },
    Symptom {
        id: "back_pain",
        label: "Back pain",
        keywords: &["back pain", "backache"],
    },
    Symptom {
        id: "dizziness",
        label: "Dizziness",
        keywords: &["dizzy", "dizziness", "lightheaded", "light-headed"],
    },
    Symptom {
        id: "chest_pain",
        label: "Chest pain",
        keywords: &["chest pain", "chest tightness", "pressure in my chest"],
    },
    Symptom {
        id: "shortness_of_breath",
        label: "Shortness of breath",
        keywords: &[
            "shortness of breath",
            "short of breath",
            "breathless",
            "trouble breathing",
            "difficulty breathing",
            "can't breathe",
            "cannot breathe",
        ],
    },
    Symptom {
        id: "skin_rash",
        label: "Skin rash",
        keywords: &["rash", "hives", "skin eruption"],
    },
    Symptom {
        id: "joint_pain",
        label: "Joint pain",
        keywords: &["joint pain", "joints hurt", "joints ache"],
    },
    Symptom {
        id: "muscle_aches",
        label: "Muscle aches",
        keywords: &["muscle ache", "muscle aches", "muscle pain", "body ache", "body aches"],
    },
    Symptom {
        id: "difficulty_sleeping",
        label: "Difficulty sleeping",
        keywords: &["can't sleep", "cannot sleep", "insomnia", "difficulty sleeping", "sleepless"],
    },
];

/// All catalog symptoms in display order. Pure, deterministic, infallible.
pub fn symptoms() -> &'static [Symptom] {
    CATALOG
}

/// Look up a catalog entry by identifier.
pub fn find(id: &str) -> Option<&'static Symptom> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Extract catalog symptoms mentioned in free text.
///
/// Case-insensitive keyword containment, the same matching the safety
/// escalation rules in the analyzer use. Results come back in catalog
/// order; text that matches nothing yields an empty vec.
pub fn normalize(free_text: &str) -> Vec<&'static Symptom> {
    let text = free_text.to_lowercase();
    if text.trim().is_empty() {
        return Vec::new();
    }
    CATALOG
        .iter()
        .filter(|s| s.keywords.iter().any(|kw| text.contains(kw)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_fifteen_symptoms_in_display_order() {
        assert_eq!(symptoms().len(), 15);
        assert_eq!(symptoms()[0].id, "fever");
        assert_eq!(symptoms()[14].id, "difficulty_sleeping");
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = symptoms().iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn find_known_and_unknown() {
        assert_eq!(find("cough").unwrap().label, "Cough");
        assert!(find("telepathy").is_none());
    }

    // ── normalize ───────────────────────────────────────────

    #[test]
    fn normalize_extracts_multiple_symptoms() {
        let found = normalize("I have a fever and a bad cough since Monday");
        let ids: Vec<_> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["fever", "cough"]);
    }

    #[test]
    fn normalize_is_case_insensitive() {
        let found = normalize("TERRIBLE HEADACHE and I feel Dizzy");
        let ids: Vec<_> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["headache", "dizziness"]);
    }

    #[test]
    fn normalize_matches_synonyms() {
        let found = normalize("I've been breathless walking upstairs");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "shortness_of_breath");
    }

    #[test]
    fn normalize_unrecognized_text_is_empty_not_error() {
        assert!(normalize("my houseplant looks sad").is_empty());
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n").is_empty());
    }

    #[test]
    fn normalize_results_follow_catalog_order() {
        // Mention cough before fever — catalog order still wins.
        let found = normalize("coughing a lot, also running a temperature");
        let ids: Vec<_> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["fever", "cough"]);
    }
}
