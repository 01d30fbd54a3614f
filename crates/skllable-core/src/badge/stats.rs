//! Aggregate learner statistics that badge criteria are checked against.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::LocalCalendar;
use crate::credential::Credential;
use crate::session::SessionRecord;
use crate::streak::StreakCalculator;

/// Number of most recent quiz scores kept in [`UserStats::recent_quiz_scores`].
pub const RECENT_QUIZ_LIMIT: usize = 5;

/// Snapshot of a learner's activity across all tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_sessions: u32,
    pub total_hours: f64,
    pub longest_streak: u32,
    pub current_streak: u32,
    /// Mean quiz percentage over graded sessions; 0 without any
    pub average_quiz_score: f64,
    pub total_credentials: u32,
    pub credentials_by_track: BTreeMap<String, u32>,
    /// Latest quiz percentages, oldest first
    pub recent_quiz_scores: Vec<f64>,
    pub sessions_this_month: u32,
    pub hours_this_month: f64,
}

impl UserStats {
    /// Build the snapshot from raw history.
    ///
    /// Only valid sessions count. Streaks span all tracks, so a day with a
    /// session on any track keeps the streak alive. "This month" is the local
    /// calendar month containing `now`.
    pub fn aggregate(
        sessions: &[SessionRecord],
        credentials: &[Credential],
        now: DateTime<Utc>,
        calendar: &LocalCalendar,
    ) -> Self {
        let mut valid: Vec<&SessionRecord> = sessions.iter().filter(|s| s.is_valid()).collect();
        valid.sort_by_key(|s| s.start_time());

        let streaks = StreakCalculator::new(*calendar);
        let today = calendar.today(now);
        let in_current_month = |s: &&SessionRecord| {
            let day = calendar.day_of(s.start_time());
            day.year() == today.year() && day.month() == today.month()
        };

        let total_minutes: u64 = valid.iter().map(|s| u64::from(s.duration())).sum();
        let month: Vec<&SessionRecord> = valid.iter().copied().filter(in_current_month).collect();
        let month_minutes: u64 = month.iter().map(|s| u64::from(s.duration())).sum();

        let quiz_scores: Vec<f64> = valid.iter().filter_map(|s| s.quiz().quiz_score).collect();
        let average_quiz_score = if quiz_scores.is_empty() {
            0.0
        } else {
            quiz_scores.iter().sum::<f64>() / quiz_scores.len() as f64
        };
        let recent_start = quiz_scores.len().saturating_sub(RECENT_QUIZ_LIMIT);

        let mut credentials_by_track = BTreeMap::new();
        for credential in credentials {
            *credentials_by_track
                .entry(credential.track_id().to_string())
                .or_insert(0) += 1;
        }

        Self {
            total_sessions: count(valid.len()),
            total_hours: total_minutes as f64 / 60.0,
            longest_streak: streaks.longest_streak(valid.iter().copied()),
            current_streak: streaks.current_streak(valid.iter().copied(), now),
            average_quiz_score,
            total_credentials: count(credentials.len()),
            credentials_by_track,
            recent_quiz_scores: quiz_scores[recent_start..].to_vec(),
            sessions_this_month: count(month.len()),
            hours_this_month: month_minutes as f64 / 60.0,
        }
    }

    /// Number of distinct tracks with at least one credential.
    pub fn credentialed_tracks(&self) -> usize {
        self.credentials_by_track.values().filter(|n| **n > 0).count()
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
