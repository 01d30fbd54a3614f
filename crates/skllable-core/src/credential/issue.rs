//! Issuing credentials.
//!
//! Issuance re-checks eligibility, snapshots the track's statistics, fixes the
//! validity window and signs the result. The issued record is never mutated;
//! expiry is a comparison against `valid_until`.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::eligibility::CredentialEvaluator;
use super::id::{validate_credential_format, CredentialId};
use super::level::CredentialLevel;
use super::signature::{CredentialSigner, PayloadToSign};
use crate::calendar::LocalCalendar;
use crate::error::{CoreError, Result, ValidationError};
use crate::session::SessionRecord;

/// Days a credential stays active after it is earned.
pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

/// Statistics captured when a credential is issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStats {
    /// Distinct active days on the track
    pub total_days: u32,
    pub total_hours: f64,
    pub longest_streak: u32,
    /// Mean session length in minutes
    pub average_session: f64,
}

/// An issued credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub(crate) id: CredentialId,
    pub(crate) track_id: String,
    pub(crate) track_title: String,
    pub(crate) level: CredentialLevel,
    pub(crate) learner_name: String,
    pub(crate) earned_date: NaiveDate,
    pub(crate) valid_until: NaiveDate,
    pub(crate) stats: CredentialStats,
    pub(crate) signature: String,
}

impl Credential {
    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn track_title(&self) -> &str {
        &self.track_title
    }

    pub fn level(&self) -> CredentialLevel {
        self.level
    }

    pub fn learner_name(&self) -> &str {
        &self.learner_name
    }

    pub fn earned_date(&self) -> NaiveDate {
        self.earned_date
    }

    pub fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    pub fn stats(&self) -> &CredentialStats {
        &self.stats
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether the credential is still within its validity window on `today`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        today <= self.valid_until
    }

    pub fn is_active(&self, now: DateTime<Utc>, calendar: &LocalCalendar) -> bool {
        self.is_active_on(calendar.today(now))
    }

    /// Days left until expiry; negative once expired.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.valid_until - today).num_days()
    }
}

/// Who and what a credential is being issued for.
#[derive(Debug, Clone)]
pub struct IssueRequest<'a> {
    pub track_id: &'a str,
    pub track_title: &'a str,
    pub learner_name: &'a str,
    pub level: CredentialLevel,
}

/// Issues signed credentials for eligible histories.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    evaluator: CredentialEvaluator,
    signer: CredentialSigner,
    validity_days: u32,
}

impl CredentialIssuer {
    pub fn new(evaluator: CredentialEvaluator, signer: CredentialSigner) -> Self {
        Self {
            evaluator,
            signer,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }

    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }

    pub fn signer(&self) -> &CredentialSigner {
        &self.signer
    }

    /// Issue a credential for `request.level` on `request.track_id`.
    ///
    /// Sessions from other tracks are ignored.
    ///
    /// # Errors
    /// Returns [`CoreError::Ineligible`] if the history does not satisfy the
    /// level, [`CoreError::Validation`] if the track identifier cannot yield a
    /// well-formed credential ID, or an error if the validity window or
    /// signature cannot be built.
    pub fn issue<R: Rng + ?Sized>(
        &self,
        request: &IssueRequest<'_>,
        sessions: &[SessionRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Credential> {
        let history: Vec<SessionRecord> = sessions
            .iter()
            .filter(|s| s.track_id() == request.track_id)
            .cloned()
            .collect();

        let state = self.evaluator.tier_state(request.level, &history, now);
        if !state.eligible {
            tracing::debug!(
                track = request.track_id,
                level = %request.level,
                progress = state.progress,
                required = state.required,
                "credential not issued: requirements unmet"
            );
            return Err(CoreError::Ineligible {
                track_id: request.track_id.to_string(),
                level: request.level,
            });
        }

        let earned_date = self.evaluator.streaks().calendar().today(now);
        let valid_until = earned_date
            .checked_add_days(Days::new(u64::from(self.validity_days)))
            .ok_or_else(|| {
                CoreError::Custom(format!(
                    "validity of {} days from {earned_date} is out of range",
                    self.validity_days
                ))
            })?;

        let id = CredentialId::generate(request.track_id, request.level, earned_date.year(), rng);
        if !validate_credential_format(id.as_str()).is_valid {
            return Err(ValidationError::InvalidValue {
                field: "trackId".to_string(),
                message: format!(
                    "'{}' does not start with two ASCII letters, so its credential ID '{id}' would not verify",
                    request.track_id
                ),
            }
            .into());
        }

        let mut credential = Credential {
            id,
            track_id: request.track_id.to_string(),
            track_title: request.track_title.to_string(),
            level: request.level,
            learner_name: request.learner_name.to_string(),
            earned_date,
            valid_until,
            stats: self.snapshot(&history),
            signature: String::new(),
        };
        credential.signature = self.signer.sign(&PayloadToSign::of(&credential))?;

        tracing::info!(
            id = %credential.id,
            track = request.track_id,
            level = %request.level,
            "credential issued"
        );
        Ok(credential)
    }

    fn snapshot(&self, history: &[SessionRecord]) -> CredentialStats {
        let valid: Vec<&SessionRecord> = history.iter().filter(|s| s.is_valid()).collect();
        let streaks = self.evaluator.streaks();
        let total_minutes: u64 = valid.iter().map(|s| u64::from(s.duration())).sum();
        let average_session = if valid.is_empty() {
            0.0
        } else {
            round_tenths(total_minutes as f64 / valid.len() as f64)
        };

        CredentialStats {
            total_days: u32::try_from(streaks.active_days(valid.iter().copied()).len())
                .unwrap_or(u32::MAX),
            total_hours: round_tenths(total_minutes as f64 / 60.0),
            longest_streak: streaks.longest_streak(valid.iter().copied()),
            average_session,
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
