//! Credential tier eligibility.
//!
//! Each tier is evaluated from the full session history of one track. Only
//! sessions marked valid count. Results carry the raw progress numbers next to
//! the decision so callers can show how far a learner is from each tier.
//!
//! | Tier        | Requirement                 | Window | Quality floor |
//! |-------------|-----------------------------|--------|---------------|
//! | Intent      | current streak >= 7         | -      | -             |
//! | Practice    | >= 90 active days           | 120 d  | >= 0.75       |
//! | Performance | >= 365 active days          | 400 d  | >= 0.80       |

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::level::{CredentialLevel, WindowRule, INTENT_STREAK_DAYS, PERFORMANCE_RULE, PRACTICE_RULE};
use crate::calendar::LocalCalendar;
use crate::session::{average_quality, SessionRecord};
use crate::streak::StreakCalculator;

/// Progress toward the streak-based Intent tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEligibility {
    pub eligible: bool,
    pub current_streak: u32,
    pub required_streak: u32,
    pub quality_score: f64,
}

/// Progress toward a windowed tier (Practice or Performance).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowEligibility {
    pub eligible: bool,
    pub active_days: u32,
    pub required_days: u32,
    pub window_days: u32,
    pub quality_score: f64,
}

/// Uniform view of one tier's state, for listing all tiers together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTierState {
    pub level: CredentialLevel,
    pub eligible: bool,
    /// Current streak (Intent) or active days in the window
    pub progress: u32,
    pub required: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    pub quality_score: f64,
}

impl CredentialTierState {
    fn from_intent(e: &IntentEligibility) -> Self {
        Self {
            level: CredentialLevel::Intent,
            eligible: e.eligible,
            progress: e.current_streak,
            required: e.required_streak,
            window_days: None,
            quality_score: e.quality_score,
        }
    }

    fn from_window(level: CredentialLevel, e: &WindowEligibility) -> Self {
        Self {
            level,
            eligible: e.eligible,
            progress: e.active_days,
            required: e.required_days,
            window_days: Some(e.window_days),
            quality_score: e.quality_score,
        }
    }

    /// Fraction of the day requirement met, capped at 1.0.
    pub fn completion(&self) -> f64 {
        if self.required == 0 {
            return 1.0;
        }
        (f64::from(self.progress) / f64::from(self.required)).min(1.0)
    }
}

/// Decides credential eligibility from session history.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialEvaluator {
    streaks: StreakCalculator,
}

impl CredentialEvaluator {
    pub fn new(calendar: LocalCalendar) -> Self {
        Self {
            streaks: StreakCalculator::new(calendar),
        }
    }

    pub fn streaks(&self) -> &StreakCalculator {
        &self.streaks
    }

    /// Intent: the current consecutive-day streak must reach 7.
    ///
    /// The reported quality is the aggregate over all valid sessions; it does
    /// not gate this tier.
    pub fn check_intent(&self, sessions: &[SessionRecord], now: DateTime<Utc>) -> IntentEligibility {
        let required_streak = INTENT_STREAK_DAYS;
        let valid = valid_only(sessions);
        let current_streak = self.streaks.current_streak(valid.iter().copied(), now);

        IntentEligibility {
            eligible: current_streak >= required_streak,
            current_streak,
            required_streak,
            quality_score: average_quality(valid.iter().copied()),
        }
    }

    /// Practice: 90 active days in the trailing 120, average quality >= 0.75.
    pub fn check_practice(&self, sessions: &[SessionRecord], now: DateTime<Utc>) -> WindowEligibility {
        self.check_window(PRACTICE_RULE, sessions, now)
    }

    /// Performance: 365 active days in the trailing 400, average quality >= 0.80.
    pub fn check_performance(
        &self,
        sessions: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> WindowEligibility {
        self.check_window(PERFORMANCE_RULE, sessions, now)
    }

    fn check_window(
        &self,
        rule: WindowRule,
        sessions: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> WindowEligibility {
        let WindowRule {
            required_days,
            window_days,
            quality_floor,
        } = rule;

        let in_window = self.streaks.in_window(valid_only(sessions), now, window_days);
        let active_days = self.streaks.active_days_in_window(in_window.iter().copied(), now, window_days);
        let quality_score = average_quality(in_window.iter().copied());

        WindowEligibility {
            eligible: active_days >= required_days && quality_score >= quality_floor,
            active_days,
            required_days,
            window_days,
            quality_score,
        }
    }

    /// State of one tier.
    pub fn tier_state(
        &self,
        level: CredentialLevel,
        sessions: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> CredentialTierState {
        match level {
            CredentialLevel::Intent => {
                CredentialTierState::from_intent(&self.check_intent(sessions, now))
            }
            CredentialLevel::Practice => {
                CredentialTierState::from_window(level, &self.check_practice(sessions, now))
            }
            CredentialLevel::Performance => {
                CredentialTierState::from_window(level, &self.check_performance(sessions, now))
            }
        }
    }

    /// State of every tier, lowest first.
    pub fn evaluate_all(&self, sessions: &[SessionRecord], now: DateTime<Utc>) -> Vec<CredentialTierState> {
        CredentialLevel::ALL
            .into_iter()
            .map(|level| self.tier_state(level, sessions, now))
            .collect()
    }

    /// Highest tier the history currently satisfies.
    pub fn highest_eligible_level(
        &self,
        sessions: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> Option<CredentialLevel> {
        self.evaluate_all(sessions, now)
            .into_iter()
            .filter(|state| state.eligible)
            .map(|state| state.level)
            .max()
    }
}

fn valid_only(sessions: &[SessionRecord]) -> Vec<&SessionRecord> {
    sessions.iter().filter(|s| s.is_valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QuizResult;
    use crate::testing::{graded_days_ago, history, now, session_with};

    fn evaluator() -> CredentialEvaluator {
        CredentialEvaluator::default()
    }

    #[test]
    fn empty_history_is_ineligible_everywhere() {
        let states = evaluator().evaluate_all(&[], now());
        assert_eq!(states.len(), 3);
        assert!(states.iter().all(|s| !s.eligible && s.progress == 0));
        assert_eq!(evaluator().highest_eligible_level(&[], now()), None);
    }

    #[test]
    fn intent_needs_seven_consecutive_days() {
        let seven = history(0..7);
        let result = evaluator().check_intent(&seven, now());
        assert!(result.eligible);
        assert_eq!(result.current_streak, 7);
        assert_eq!(result.required_streak, 7);

        let six = history(0..6);
        let result = evaluator().check_intent(&six, now());
        assert!(!result.eligible);
        assert_eq!(result.current_streak, 6);
    }

    #[test]
    fn intent_reports_streak_up_to_the_gap() {
        let sessions = history([0, 1, 2, 4, 5, 6, 7]);
        assert_eq!(evaluator().check_intent(&sessions, now()).current_streak, 3);
    }

    #[test]
    fn invalid_sessions_do_not_count() {
        let mut sessions = history(1..7);
        sessions.push(session_with(0, 9, QuizResult::default(), false));
        let result = evaluator().check_intent(&sessions, now());
        assert_eq!(result.current_streak, 0);
        assert!(!result.eligible);
    }

    #[test]
    fn intent_quality_is_reported_but_not_gating() {
        let sessions: Vec<_> = (0..7)
            .map(|d| graded_days_ago(d, QuizResult::scored(0.0).with_response_time(60.0)))
            .collect();
        let result = evaluator().check_intent(&sessions, now());
        assert!(result.eligible);
        assert_eq!(result.quality_score, 0.3);
    }

    fn practice_history(high: usize, low: usize) -> Vec<SessionRecord> {
        // quality 1.0 for the first `high` days, 0.5 for the next `low` days
        (0..(high + low) as i64)
            .map(|d| {
                let quiz = if (d as usize) < high {
                    QuizResult::scored(100.0).with_response_time(10.0)
                } else {
                    QuizResult::scored(50.0)
                };
                graded_days_ago(d, quiz)
            })
            .collect()
    }

    #[test]
    fn practice_accepts_quality_exactly_at_floor() {
        let sessions = practice_history(45, 45);
        let result = evaluator().check_practice(&sessions, now());
        assert_eq!(result.active_days, 90);
        assert_eq!(result.required_days, 90);
        assert_eq!(result.window_days, 120);
        assert_eq!(result.quality_score, 0.75);
        assert!(result.eligible);
    }

    #[test]
    fn practice_rejects_quality_below_floor() {
        // 0.6 * 0.9 + 0.2 = 0.74 for every session
        let sessions: Vec<_> = (0..90)
            .map(|d| graded_days_ago(d, QuizResult::scored(90.0)))
            .collect();
        let result = evaluator().check_practice(&sessions, now());
        assert_eq!(result.active_days, 90);
        assert_eq!(result.quality_score, 0.74);
        assert!(!result.eligible);
    }

    #[test]
    fn practice_needs_ninety_days() {
        let sessions = practice_history(89, 0);
        let result = evaluator().check_practice(&sessions, now());
        assert_eq!(result.active_days, 89);
        assert_eq!(result.quality_score, 1.0);
        assert!(!result.eligible);
    }

    #[test]
    fn practice_without_quiz_evidence_fails_closed() {
        let sessions = history(0..120);
        let result = evaluator().check_practice(&sessions, now());
        assert_eq!(result.active_days, 120);
        assert_eq!(result.quality_score, 0.0);
        assert!(!result.eligible);
    }

    #[test]
    fn practice_only_counts_the_window() {
        // 60 recent days plus 60 days that are older than the window
        let mut sessions = practice_history(60, 0);
        sessions.extend((130..190).map(|d| {
            graded_days_ago(d, QuizResult::scored(100.0).with_response_time(10.0))
        }));
        let result = evaluator().check_practice(&sessions, now());
        assert_eq!(result.active_days, 60);
        assert!(!result.eligible);
    }

    #[test]
    fn performance_needs_a_year_of_quality() {
        let sessions = practice_history(365, 0);
        let result = evaluator().check_performance(&sessions, now());
        assert_eq!(result.active_days, 365);
        assert_eq!(result.required_days, 365);
        assert_eq!(result.window_days, 400);
        assert!(result.eligible);
        assert_eq!(
            evaluator().highest_eligible_level(&sessions, now()),
            Some(CredentialLevel::Performance)
        );

        let sessions = practice_history(364, 0);
        assert!(!evaluator().check_performance(&sessions, now()).eligible);
    }

    fn performance_history(avg_response_secs: f64) -> Vec<SessionRecord> {
        (0..365)
            .map(|d| {
                graded_days_ago(d, QuizResult::scored(100.0).with_response_time(avg_response_secs))
            })
            .collect()
    }

    #[test]
    fn performance_accepts_quality_exactly_at_floor() {
        // 0.6 + (0.4 - 6 / 30) = 0.80
        let result = evaluator().check_performance(&performance_history(16.0), now());
        assert_eq!(result.active_days, 365);
        assert_eq!(result.quality_score, 0.8);
        assert!(result.eligible);
    }

    #[test]
    fn performance_rejects_quality_just_below_floor() {
        // 0.6 + (0.4 - 6.3 / 30) = 0.79
        let result = evaluator().check_performance(&performance_history(16.3), now());
        assert_eq!(result.active_days, 365);
        assert_eq!(result.quality_score, 0.79);
        assert!(!result.eligible);
    }

    #[test]
    fn tier_state_exposes_progress() {
        let sessions = history(0..3);
        let state = evaluator().tier_state(CredentialLevel::Intent, &sessions, now());
        assert_eq!(state.progress, 3);
        assert_eq!(state.required, 7);
        assert!(state.window_days.is_none());
        assert!((state.completion() - 3.0 / 7.0).abs() < 1e-12);

        let state = evaluator().tier_state(CredentialLevel::Practice, &sessions, now());
        assert_eq!(state.window_days, Some(120));
        assert_eq!(state.progress, 3);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let sessions = practice_history(50, 50);
        let first = evaluator().evaluate_all(&sessions, now());
        let second = evaluator().evaluate_all(&sessions, now());
        assert_eq!(first, second);
    }
}
