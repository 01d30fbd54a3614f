//! Badge criteria.
//!
//! Each badge has exactly one criterion. Most compare a single statistic with
//! a threshold; [`Criterion::Consistency`] is a compound rule over the current
//! streak and the quiz average.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::UserStats;

/// Minimum average quiz percentage required by consistency badges.
pub const CONSISTENCY_MIN_QUIZ_AVERAGE: f64 = 85.0;

/// Comparison applied between a statistic and a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    Below,
    #[serde(rename = "<=")]
    AtMost,
}

impl Comparison {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= threshold,
            Comparison::Above => value > threshold,
            Comparison::Equal => value == threshold,
            Comparison::Below => value < threshold,
            Comparison::AtMost => value <= threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::Above => ">",
            Comparison::Equal => "=",
            Comparison::Below => "<",
            Comparison::AtMost => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Period a sessions or time criterion is measured over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    AllTime,
    /// The current calendar month
    Month,
}

fn is_all_time(timeframe: &Timeframe) -> bool {
    *timeframe == Timeframe::AllTime
}

/// What a badge requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    /// Number of valid sessions.
    Sessions {
        #[serde(default)]
        operator: Comparison,
        value: f64,
        #[serde(default, skip_serializing_if = "is_all_time")]
        timeframe: Timeframe,
    },
    /// Learning time in minutes.
    Time {
        #[serde(default)]
        operator: Comparison,
        value: f64,
        #[serde(default, skip_serializing_if = "is_all_time")]
        timeframe: Timeframe,
    },
    /// Longest streak in days.
    Streak {
        #[serde(default)]
        operator: Comparison,
        value: f64,
    },
    /// Average quiz percentage.
    QuizScore {
        #[serde(default)]
        operator: Comparison,
        value: f64,
    },
    /// Number of issued credentials.
    Credentials {
        #[serde(default)]
        operator: Comparison,
        value: f64,
    },
    /// Current streak of at least `value` days together with a quiz average of
    /// at least [`CONSISTENCY_MIN_QUIZ_AVERAGE`].
    Consistency { value: u32 },
}

impl Criterion {
    /// `value` or more valid sessions, all time.
    pub fn sessions_at_least(value: u32) -> Self {
        Criterion::Sessions {
            operator: Comparison::AtLeast,
            value: f64::from(value),
            timeframe: Timeframe::AllTime,
        }
    }

    /// `minutes` or more of learning time within `timeframe`.
    pub fn time_at_least(minutes: u32, timeframe: Timeframe) -> Self {
        Criterion::Time {
            operator: Comparison::AtLeast,
            value: f64::from(minutes),
            timeframe,
        }
    }

    pub fn streak_at_least(days: u32) -> Self {
        Criterion::Streak {
            operator: Comparison::AtLeast,
            value: f64::from(days),
        }
    }

    pub fn quiz_score_at_least(score: f64) -> Self {
        Criterion::QuizScore {
            operator: Comparison::AtLeast,
            value: score,
        }
    }

    pub fn credentials_at_least(count: u32) -> Self {
        Criterion::Credentials {
            operator: Comparison::AtLeast,
            value: f64::from(count),
        }
    }

    /// Whether `stats` satisfies the criterion.
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match *self {
            Criterion::Consistency { value } => {
                stats.current_streak >= value
                    && stats.average_quiz_score >= CONSISTENCY_MIN_QUIZ_AVERAGE
            }
            Criterion::Sessions { operator, value, .. }
            | Criterion::Time { operator, value, .. }
            | Criterion::Streak { operator, value }
            | Criterion::QuizScore { operator, value }
            | Criterion::Credentials { operator, value } => {
                // metric() is Some for every non-compound variant
                self.metric(stats)
                    .is_some_and(|metric| operator.holds(metric, value))
            }
        }
    }

    /// The statistic a simple criterion compares, or `None` for compound rules.
    pub fn metric(&self, stats: &UserStats) -> Option<f64> {
        let metric = match *self {
            Criterion::Sessions { timeframe, .. } => match timeframe {
                Timeframe::AllTime => f64::from(stats.total_sessions),
                Timeframe::Month => f64::from(stats.sessions_this_month),
            },
            Criterion::Time { timeframe, .. } => {
                let hours = match timeframe {
                    Timeframe::AllTime => stats.total_hours,
                    Timeframe::Month => stats.hours_this_month,
                };
                to_minutes(hours)
            }
            Criterion::Streak { .. } => f64::from(stats.longest_streak),
            Criterion::QuizScore { .. } => stats.average_quiz_score,
            Criterion::Credentials { .. } => f64::from(stats.total_credentials),
            Criterion::Consistency { .. } => return None,
        };
        Some(metric)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Criterion::Sessions { .. } => "sessions",
            Criterion::Time { .. } => "time",
            Criterion::Streak { .. } => "streak",
            Criterion::QuizScore { .. } => "quiz_score",
            Criterion::Credentials { .. } => "credentials",
            Criterion::Consistency { .. } => "consistency",
        }
    }
}

// Hours are stored fractionally; snap to a thousandth of a minute so whole
// minute thresholds compare exactly.
fn to_minutes(hours: f64) -> f64 {
    (hours * 60.0 * 1000.0).round() / 1000.0
}
