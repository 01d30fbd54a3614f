//! Credential levels and their requirements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Credential tier, in increasing order of required consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CredentialLevel {
    /// Seven consecutive days of practice
    Intent,
    /// 90 active days within 120
    Practice,
    /// 365 active days within 400
    Performance,
}

/// `required_days` distinct active days inside the trailing `window_days`,
/// with the window's average quality at or above `quality_floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRule {
    pub required_days: u32,
    pub window_days: u32,
    pub quality_floor: f64,
}

/// Consecutive days required for Intent.
pub const INTENT_STREAK_DAYS: u32 = 7;

pub const PRACTICE_RULE: WindowRule = WindowRule {
    required_days: 90,
    window_days: 120,
    quality_floor: 0.75,
};

pub const PERFORMANCE_RULE: WindowRule = WindowRule {
    required_days: 365,
    window_days: 400,
    quality_floor: 0.80,
};

/// What a level demands of the session history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierRequirement {
    /// Current consecutive-day streak must reach `required_days`
    Streak { required_days: u32 },
    Window(WindowRule),
}

impl TierRequirement {
    /// Day count the tier asks for, streak or active days.
    pub fn required_days(self) -> u32 {
        match self {
            TierRequirement::Streak { required_days } => required_days,
            TierRequirement::Window(rule) => rule.required_days,
        }
    }
}

impl CredentialLevel {
    pub const ALL: [CredentialLevel; 3] = [
        CredentialLevel::Intent,
        CredentialLevel::Practice,
        CredentialLevel::Performance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CredentialLevel::Intent => "Intent",
            CredentialLevel::Practice => "Practice",
            CredentialLevel::Performance => "Performance",
        }
    }

    /// Three-letter code used in credential IDs.
    pub fn code(self) -> String {
        self.name().chars().take(3).collect::<String>().to_uppercase()
    }

    pub fn requirement(self) -> TierRequirement {
        match self {
            CredentialLevel::Intent => TierRequirement::Streak {
                required_days: INTENT_STREAK_DAYS,
            },
            CredentialLevel::Practice => TierRequirement::Window(PRACTICE_RULE),
            CredentialLevel::Performance => TierRequirement::Window(PERFORMANCE_RULE),
        }
    }
}

impl fmt::Display for CredentialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CredentialLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CredentialLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "level".to_string(),
                message: format!("'{s}' is not one of Intent, Practice, Performance"),
            })
    }
}
