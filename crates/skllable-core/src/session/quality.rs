//! Session quality scoring.
//!
//! Quality blends quiz accuracy (60%) with answer pacing (40%). Pacing peaks
//! at a 10 second average per question and degrades linearly on either side,
//! never contributing less than 0.1. Every score is clamped to `[0.3, 1.0]`
//! and reported to three decimal places so threshold checks are stable.

use serde::Serialize;

use super::record::{QuizResult, SessionRecord};

pub const QUALITY_FLOOR: f64 = 0.3;
pub const QUALITY_CEILING: f64 = 1.0;

const QUIZ_WEIGHT: f64 = 0.6;
const RESPONSE_WEIGHT: f64 = 0.4;
const MIN_RESPONSE_COMPONENT: f64 = 0.1;
const OPTIMAL_RESPONSE_SECS: f64 = 10.0;
const RESPONSE_PENALTY_SPAN_SECS: f64 = 30.0;

/// Quality of a session with no quiz at all, when judged on its own.
const UNGRADED_SESSION_QUALITY: f64 = 1.0;

/// Pacing credit used in aggregates when a graded session has no timing data.
const AGGREGATE_UNTIMED_COMPONENT: f64 = 0.2;

/// Aggregate quality when a window holds no graded sessions.
pub const UNGRADED_AGGREGATE_QUALITY: f64 = 0.0;

fn round_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// A quality score in `[0.3, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct QualityScore(f64);

impl QualityScore {
    /// Clamp and round a raw score.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(QUALITY_FLOOR);
        }
        Self(round_millis(raw.clamp(QUALITY_FLOOR, QUALITY_CEILING)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Quality of a single submitted session.
    ///
    /// Sessions without a quiz score get the full base score; graded
    /// sessions without timing data get full pacing credit.
    pub fn for_session(quiz: &QuizResult) -> Self {
        match quiz.quiz_score {
            None => Self::new(UNGRADED_SESSION_QUALITY),
            Some(score) => {
                let pacing = quiz
                    .avg_response_time
                    .map(response_time_component)
                    .unwrap_or(RESPONSE_WEIGHT);
                Self::new(QUIZ_WEIGHT * score / 100.0 + pacing)
            }
        }
    }

    /// Quality of a stored session as it counts toward tier averages.
    ///
    /// Returns `None` for ungraded sessions, which do not participate.
    pub fn for_aggregate(quiz: &QuizResult) -> Option<Self> {
        let score = quiz.quiz_score?;
        let pacing = quiz
            .avg_response_time
            .map(response_time_component)
            .unwrap_or(AGGREGATE_UNTIMED_COMPONENT);
        Some(Self::new(QUIZ_WEIGHT * score / 100.0 + pacing))
    }
}

/// Pacing contribution for an average response time in seconds.
pub fn response_time_component(avg_response_secs: f64) -> f64 {
    let drift = (avg_response_secs - OPTIMAL_RESPONSE_SECS).abs();
    (RESPONSE_WEIGHT - drift / RESPONSE_PENALTY_SPAN_SECS).max(MIN_RESPONSE_COMPONENT)
}

/// Mean aggregate quality over the graded sessions in `sessions`.
///
/// Ungraded sessions are skipped. With no graded session the result is
/// [`UNGRADED_AGGREGATE_QUALITY`], so quality floors cannot be met without
/// evidence.
pub fn average_quality<'a, I>(sessions: I) -> f64
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let (sum, count) = sessions
        .into_iter()
        .filter_map(|s| QualityScore::for_aggregate(s.quiz()))
        .fold((0.0, 0u32), |(sum, n), q| (sum + q.value(), n + 1));

    if count == 0 {
        UNGRADED_AGGREGATE_QUALITY
    } else {
        round_millis(sum / f64::from(count))
    }
}
