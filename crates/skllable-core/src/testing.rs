//! Session history fixtures shared by unit tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::session::{QuizResult, SessionCandidate, SessionRecord};

pub const TRACK: &str = "data-analysis";

/// Fixed evaluation instant: 2024-06-30 18:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// A valid 30 minute session starting at 09:00 UTC, `days_ago` days before today.
pub fn session_days_ago(days_ago: i64) -> SessionRecord {
    session_with(days_ago, 9, QuizResult::default(), true)
}

/// A valid, graded 30 minute session `days_ago` days before today.
pub fn graded_days_ago(days_ago: i64, quiz: QuizResult) -> SessionRecord {
    session_with(days_ago, 9, quiz, true)
}

pub fn session_with(days_ago: i64, hour: u32, quiz: QuizResult, valid: bool) -> SessionRecord {
    session_for(TRACK, days_ago, hour, quiz, valid)
}

/// A valid ungraded session on another track.
pub fn session_on_track(track: &str, days_ago: i64) -> SessionRecord {
    session_for(track, days_ago, 9, QuizResult::default(), true)
}

fn session_for(track: &str, days_ago: i64, hour: u32, quiz: QuizResult, valid: bool) -> SessionRecord {
    let day = today() - Duration::days(days_ago);
    let start = Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
    let candidate = SessionCandidate::new(
        format!("{track}-{days_ago}-{hour}"),
        track,
        start,
        start + Duration::minutes(30),
    )
    .unwrap()
    .with_quiz(quiz)
    .unwrap();
    SessionRecord::new(candidate, valid)
}

/// One valid ungraded session on each of the given days-ago offsets.
pub fn history(days_ago: impl IntoIterator<Item = i64>) -> Vec<SessionRecord> {
    days_ago.into_iter().map(session_days_ago).collect()
}
