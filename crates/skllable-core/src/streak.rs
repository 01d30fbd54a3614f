//! Day-streak and windowed activity metrics.
//!
//! Sessions are collapsed to the set of local dates they started on, so any
//! number of sessions on one day counts as a single active day.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::calendar::LocalCalendar;
use crate::session::SessionRecord;

/// Derives streak and consistency metrics from session history.
///
/// The calculator does not filter by validity; callers pass the sessions that
/// should count.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    calendar: LocalCalendar,
}

impl StreakCalculator {
    pub fn new(calendar: LocalCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &LocalCalendar {
        &self.calendar
    }

    /// Distinct local dates with at least one session.
    pub fn active_days<'a, I>(&self, sessions: I) -> BTreeSet<NaiveDate>
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        sessions
            .into_iter()
            .map(|s| self.calendar.day_of(s.start_time()))
            .collect()
    }

    /// Consecutive active days ending today.
    ///
    /// Returns 0 when today has no session yet, even if yesterday did.
    pub fn current_streak<'a, I>(&self, sessions: I, now: DateTime<Utc>) -> u32
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let days = self.active_days(sessions);
        let mut day = self.calendar.today(now);
        let mut streak = 0;

        while days.contains(&day) {
            streak += 1;
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }

        streak
    }

    /// Longest run of consecutive active days anywhere in the history.
    pub fn longest_streak<'a, I>(&self, sessions: I) -> u32
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for day in self.active_days(sessions) {
            run = match previous.and_then(|p| p.succ_opt()) {
                Some(next) if next == day => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(day);
        }

        longest
    }

    /// Sessions that started within the trailing `window_days` before `now`.
    pub fn in_window<'a, I>(&self, sessions: I, now: DateTime<Utc>, window_days: u32) -> Vec<&'a SessionRecord>
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        // Windows reaching past the representable range have no lower bound.
        let window_start =
            Duration::try_days(i64::from(window_days)).and_then(|span| now.checked_sub_signed(span));
        sessions
            .into_iter()
            .filter(|s| window_start.map_or(true, |start| s.start_time() >= start))
            .collect()
    }

    /// Distinct active days within the trailing `window_days` before `now`.
    pub fn active_days_in_window<'a, I>(&self, sessions: I, now: DateTime<Utc>, window_days: u32) -> u32
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let days = self.active_days(self.in_window(sessions, now, window_days));
        u32::try_from(days.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QuizResult;
    use crate::testing::{history, now, session_with};

    #[test]
    fn empty_history_is_a_zero_state() {
        let calc = StreakCalculator::default();
        let empty: Vec<SessionRecord> = Vec::new();
        assert_eq!(calc.current_streak(&empty, now()), 0);
        assert_eq!(calc.longest_streak(&empty), 0);
        assert_eq!(calc.active_days_in_window(&empty, now(), 120), 0);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let calc = StreakCalculator::default();
        // today, yesterday, two days ago, then a gap at three days ago
        let sessions = history([0, 1, 2, 4, 5]);
        assert_eq!(calc.current_streak(&sessions, now()), 3);
    }

    #[test]
    fn streak_is_zero_without_a_session_today() {
        let calc = StreakCalculator::default();
        let sessions = history([1, 2, 3]);
        assert_eq!(calc.current_streak(&sessions, now()), 0);
    }

    #[test]
    fn same_day_sessions_count_once() {
        let calc = StreakCalculator::default();
        let sessions = vec![
            session_with(0, 8, QuizResult::default(), true),
            session_with(0, 14, QuizResult::default(), true),
            session_with(1, 9, QuizResult::default(), true),
        ];
        assert_eq!(calc.current_streak(&sessions, now()), 2);
        assert_eq!(calc.active_days(&sessions).len(), 2);
        assert_eq!(calc.active_days_in_window(&sessions, now(), 7), 2);
    }

    #[test]
    fn unordered_input_gives_same_streak() {
        let calc = StreakCalculator::default();
        let sessions = history([2, 0, 1, 3]);
        assert_eq!(calc.current_streak(&sessions, now()), 4);
    }

    #[test]
    fn longest_streak_finds_best_historical_run() {
        let calc = StreakCalculator::default();
        let sessions = history([0, 1, 10, 11, 12, 13, 14, 30]);
        assert_eq!(calc.longest_streak(&sessions), 5);
    }

    #[test]
    fn window_excludes_older_sessions() {
        let calc = StreakCalculator::default();
        // the evaluation instant is 18:00 and sessions start at 09:00, so a
        // session 10 days back falls just outside a 10 day window
        let sessions = history([0, 5, 9, 10, 40]);
        assert_eq!(calc.active_days_in_window(&sessions, now(), 10), 3);
        assert_eq!(calc.active_days_in_window(&sessions, now(), 11), 4);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let calc = StreakCalculator::default();
        // now() is 18:00, so 18:00 ten days back is exactly now - 10 days
        let at_cutoff = vec![session_with(10, 18, QuizResult::default(), true)];
        assert_eq!(calc.in_window(&at_cutoff, now(), 10).len(), 1);
        assert_eq!(calc.active_days_in_window(&at_cutoff, now(), 10), 1);

        let before_cutoff = vec![session_with(10, 17, QuizResult::default(), true)];
        assert_eq!(calc.active_days_in_window(&before_cutoff, now(), 10), 0);
    }

    #[test]
    fn local_offset_moves_day_boundaries() {
        // at UTC-10 the 09:00 UTC session lands at 23:00 the previous evening,
        // while the 18:00 UTC evaluation instant is 08:00 local today
        let calc = StreakCalculator::new(LocalCalendar::from_offset_minutes(-600).unwrap());
        let sessions = history([0]);
        assert_eq!(calc.current_streak(&sessions, now()), 0);
        let yesterday = crate::testing::today().pred_opt().unwrap();
        assert!(calc.active_days(&sessions).contains(&yesterday));
        assert_eq!(StreakCalculator::default().current_streak(&sessions, now()), 1);
    }
}
