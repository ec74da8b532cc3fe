//! Context questions asked on the "Additional Details" step.
//!
//! Four fixed questions, each with a closed answer domain. Every answer is
//! optional until the step requiring it is reached — and the step itself
//! never requires one, so a session may reach analysis with no context at
//! all.

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// The fixed context-question keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKey {
    Onset,
    Severity,
    AgeBand,
    Gender,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onset => "onset",
            Self::Severity => "severity",
            Self::AgeBand => "age_band",
            Self::Gender => "gender",
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate an answer enum with `as_str` + `FromStr`. Parsing anything
/// outside the domain yields `InvalidContextValue` for the owning key.
macro_rules! answer_enum {
    ($name:ident, $key:expr, { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = TriageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(TriageError::InvalidContextValue {
                        key: $key,
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

answer_enum!(Onset, ContextKey::Onset, {
    Today => "today",
    Yesterday => "yesterday",
    TwoToThreeDays => "two_three_days",
    OverAWeek => "over_a_week",
});

answer_enum!(Severity, ContextKey::Severity, {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

answer_enum!(AgeBand, ContextKey::AgeBand, {
    Under18 => "under_18",
    From18To35 => "18_35",
    From35To60 => "35_60",
    Over60 => "over_60",
});

answer_enum!(Gender, ContextKey::Gender, {
    Male => "male",
    Female => "female",
    Other => "other",
});

// ─── Answers ─────────────────────────────────────────────────────────────────

/// One optional slot per context question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextAnswers {
    pub onset: Option<Onset>,
    pub severity: Option<Severity>,
    pub age_band: Option<AgeBand>,
    pub gender: Option<Gender>,
}

impl ContextAnswers {
    /// Parse and store a raw answer, overwriting any prior value for the key.
    /// Out-of-domain values are rejected before any write.
    pub fn set(&mut self, key: ContextKey, raw: &str) -> Result<(), TriageError> {
        match key {
            ContextKey::Onset => self.onset = Some(raw.parse()?),
            ContextKey::Severity => self.severity = Some(raw.parse()?),
            ContextKey::AgeBand => self.age_band = Some(raw.parse()?),
            ContextKey::Gender => self.gender = Some(raw.parse()?),
        }
        Ok(())
    }

    /// String form of the stored answer, if any.
    pub fn get(&self, key: ContextKey) -> Option<&'static str> {
        match key {
            ContextKey::Onset => self.onset.map(|v| v.as_str()),
            ContextKey::Severity => self.severity.map(|v| v.as_str()),
            ContextKey::AgeBand => self.age_band.map(|v| v.as_str()),
            ContextKey::Gender => self.gender.map(|v| v.as_str()),
        }
    }

    pub fn answered_count(&self) -> usize {
        [
            self.onset.is_some(),
            self.severity.is_some(),
            self.age_band.is_some(),
            self.gender.is_some(),
        ]
        .iter()
        .filter(|a| **a)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.answered_count() == 0
    }
}
