//! Activity timeline and public verification page data.
//!
//! The timeline is for display only: it never feeds eligibility decisions.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use super::issue::Credential;
use crate::calendar::LocalCalendar;
use crate::session::SessionRecord;

/// One seven-day bucket of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineWeek {
    /// First day of the bucket, `YYYY-MM-DD`
    pub week: String,
    pub active: bool,
}

/// Weekly activity from `earned_date` up to today.
///
/// Buckets start on the earned date and every seven days after it, as long as
/// the bucket start is not after today. A bucket is active when at least one
/// valid session starts on one of its seven local days. An earned date in the
/// future yields an empty timeline.
pub fn generate_timeline<'a, I>(
    sessions: I,
    earned_date: NaiveDate,
    now: DateTime<Utc>,
    calendar: &LocalCalendar,
) -> Vec<TimelineWeek>
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let today = calendar.today(now);
    let mut days: Vec<NaiveDate> = sessions
        .into_iter()
        .filter(|s| s.is_valid())
        .map(|s| calendar.day_of(s.start_time()))
        .filter(|day| *day >= earned_date && *day <= today)
        .collect();
    days.sort_unstable();
    days.dedup();

    let mut timeline = Vec::new();
    let mut week_start = earned_date;
    while week_start <= today {
        let week_end = week_start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        let active = days.iter().any(|day| *day >= week_start && *day <= week_end);
        timeline.push(TimelineWeek {
            week: week_start.format("%Y-%m-%d").to_string(),
            active,
        });

        match week_start.checked_add_days(Days::new(7)) {
            Some(next) => week_start = next,
            None => break,
        }
    }
    timeline
}

/// Everything a public verification page shows for one credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPage {
    pub credential: Credential,
    pub is_active: bool,
    pub days_remaining: i64,
    pub timeline: Vec<TimelineWeek>,
}

/// Build page data for `credential` from the learner's sessions on its track.
pub fn verification_page(
    credential: &Credential,
    sessions: &[SessionRecord],
    now: DateTime<Utc>,
    calendar: &LocalCalendar,
) -> VerificationPage {
    let today = calendar.today(now);
    let track_sessions = sessions
        .iter()
        .filter(|s| s.track_id() == credential.track_id());

    VerificationPage {
        credential: credential.clone(),
        is_active: credential.is_active_on(today),
        days_remaining: credential.days_remaining(today),
        timeline: generate_timeline(track_sessions, credential.earned_date(), now, calendar),
    }
}
