//! Engine configuration: global defaults with per-subject overrides.

use serde::{Deserialize, Serialize};

/// Global settings configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Upper bound on a card's interval. `None` lets intervals grow without limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_interval_days: Option<u32>,
    pub new_cards_per_session: u32,
    pub reviews_per_session: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            maximum_interval_days: None,
            new_cards_per_session: 20,
            reviews_per_session: 200,
        }
    }
}

/// A subject's override of the global interval cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapOverride {
    /// Use whatever the global settings say.
    #[default]
    Inherit,
    /// No cap for this subject, even when a global cap is set.
    Uncapped,
    Days(u32),
}

impl CapOverride {
    pub fn resolve(self, global: Option<u32>) -> Option<u32> {
        match self {
            Self::Inherit => global,
            Self::Uncapped => None,
            Self::Days(days) => Some(days),
        }
    }
}

/// Per-subject settings (all fields optional for overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSettings {
    pub subject: String,
    #[serde(default)]
    pub maximum_interval: CapOverride,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cards_per_session: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_per_session: Option<u32>,
}

impl SubjectSettings {
    /// Create subject settings with only the subject set.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            maximum_interval: CapOverride::Inherit,
            new_cards_per_session: None,
            reviews_per_session: None,
        }
    }
}

/// Effective settings (global merged with subject overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub maximum_interval_days: Option<u32>,
    pub new_cards_per_session: u32,
    pub reviews_per_session: u32,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self::merge(&GlobalSettings::default(), None)
    }
}

impl EffectiveSettings {
    /// Merge global settings with optional subject settings.
    pub fn merge(global: &GlobalSettings, subject: Option<&SubjectSettings>) -> Self {
        match subject {
            Some(s) => Self {
                maximum_interval_days: s.maximum_interval.resolve(global.maximum_interval_days),
                new_cards_per_session: s
                    .new_cards_per_session
                    .unwrap_or(global.new_cards_per_session),
                reviews_per_session: s.reviews_per_session.unwrap_or(global.reviews_per_session),
            },
            None => Self {
                maximum_interval_days: global.maximum_interval_days,
                new_cards_per_session: global.new_cards_per_session,
                reviews_per_session: global.reviews_per_session,
            },
        }
    }
}
