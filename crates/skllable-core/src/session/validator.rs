//! Session integrity checks.
//!
//! A submitted session is rejected if it is too short, too long, or starts
//! inside the cooldown that follows an earlier session on the same track.
//! Accepted sessions get a quality score. Rules are checked in that order and
//! the first failure wins.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::quality::QualityScore;
use super::record::{SessionCandidate, SessionRecord};

/// Bounds applied to every submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Shortest accepted session (minutes, inclusive)
    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,
    /// Longest accepted session (minutes, inclusive)
    #[serde(default = "default_max_session_minutes")]
    pub max_session_minutes: u32,
    /// Required gap between the end of one session and the start of the next
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
}

fn default_min_session_minutes() -> u32 {
    15
}
fn default_max_session_minutes() -> u32 {
    180
}
fn default_cooldown_hours() -> u32 {
    4
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_session_minutes: default_min_session_minutes(),
            max_session_minutes: default_max_session_minutes(),
            cooldown_hours: default_cooldown_hours(),
        }
    }
}

/// Why a session was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    TooShort,
    TooLong,
    CooldownViolation,
}

impl RejectionReason {
    /// Stable human-readable message for this reason under `rules`.
    pub fn message(self, rules: &ValidationRules) -> String {
        match self {
            RejectionReason::TooShort => {
                format!("Session must be at least {} minutes", rules.min_session_minutes)
            }
            RejectionReason::TooLong => {
                format!("Session cannot exceed {} minutes", rules.max_session_minutes)
            }
            RejectionReason::CooldownViolation => {
                format!("Please wait at least {} hours between sessions", rules.cooldown_hours)
            }
        }
    }
}

/// Outcome of validating one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionVerdict {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<QualityScore>,
}

impl SessionVerdict {
    fn accepted(quality: QualityScore) -> Self {
        Self {
            is_valid: true,
            rejection: None,
            reason: None,
            quality_score: Some(quality),
        }
    }

    fn rejected(reason: RejectionReason, rules: &ValidationRules) -> Self {
        Self {
            is_valid: false,
            rejection: Some(reason),
            reason: Some(reason.message(rules)),
            quality_score: None,
        }
    }
}

/// Validates submitted sessions against [`ValidationRules`].
#[derive(Debug, Clone, Default)]
pub struct SessionValidator {
    rules: ValidationRules,
}

impl SessionValidator {
    /// Create a validator with the default bounds (15-180 minutes, 4 hour cooldown)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Judge `candidate` against the learner's earlier sessions.
    ///
    /// Only earlier sessions on the candidate's track take part in the
    /// cooldown check; any of them ending less than the cooldown before the
    /// candidate starts (or after it starts) is a violation.
    pub fn validate(&self, candidate: &SessionCandidate, prior: &[SessionRecord]) -> SessionVerdict {
        let duration = candidate.duration();
        let span = candidate.span();

        if span < Duration::minutes(i64::from(self.rules.min_session_minutes)) {
            tracing::debug!(session = candidate.id(), duration, "session rejected: too short");
            return SessionVerdict::rejected(RejectionReason::TooShort, &self.rules);
        }

        if span > Duration::minutes(i64::from(self.rules.max_session_minutes)) {
            tracing::debug!(session = candidate.id(), duration, "session rejected: too long");
            return SessionVerdict::rejected(RejectionReason::TooLong, &self.rules);
        }

        let cooldown = Duration::hours(i64::from(self.rules.cooldown_hours));
        let conflict = prior
            .iter()
            .filter(|p| p.track_id() == candidate.track_id())
            .find(|p| candidate.start_time() - p.end_time() < cooldown);

        if let Some(previous) = conflict {
            tracing::debug!(
                session = candidate.id(),
                conflicting = previous.id(),
                "session rejected: cooldown"
            );
            return SessionVerdict::rejected(RejectionReason::CooldownViolation, &self.rules);
        }

        let quality = QualityScore::for_session(candidate.quiz());
        tracing::debug!(session = candidate.id(), quality = quality.value(), "session accepted");
        SessionVerdict::accepted(quality)
    }

    /// Validate and produce the stored record with its validity fixed.
    pub fn finalize(
        &self,
        candidate: SessionCandidate,
        prior: &[SessionRecord],
    ) -> (SessionVerdict, SessionRecord) {
        let verdict = self.validate(&candidate, prior);
        let record = SessionRecord::new(candidate, verdict.is_valid);
        (verdict, record)
    }
}
