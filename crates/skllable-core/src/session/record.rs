//! Session records and candidates.
//!
//! A [`SessionCandidate`] is an attempt that has not been judged yet. A
//! [`SessionRecord`] is the stored form: its validity flag is fixed when the
//! record is created and there is no API to change it afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Optional quiz metrics attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// Percentage of correct answers (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<f64>,
    /// Average seconds spent per question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_correct: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_total: Option<u32>,
}

impl QuizResult {
    /// Quiz result with only a percentage score.
    pub fn scored(score: f64) -> Self {
        Self {
            quiz_score: Some(score),
            ..Default::default()
        }
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.avg_response_time = Some(seconds);
        self
    }

    /// Record answer counts and derive the score from them when none is set.
    pub fn with_answers(mut self, correct: u32, total: u32) -> Self {
        self.questions_correct = Some(correct);
        self.questions_total = Some(total);
        if self.quiz_score.is_none() && total > 0 {
            self.quiz_score = Some(f64::from(correct) / f64::from(total) * 100.0);
        }
        self
    }

    /// Whether the session carries graded evidence.
    pub fn is_graded(&self) -> bool {
        self.quiz_score.is_some()
    }

    fn check(&self) -> Result<(), ValidationError> {
        if let Some(score) = self.quiz_score {
            if !(0.0..=100.0).contains(&score) {
                return Err(ValidationError::InvalidValue {
                    field: "quizScore".to_string(),
                    message: format!("{score} is outside 0-100"),
                });
            }
        }
        if let Some(secs) = self.avg_response_time {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: "avgResponseTime".to_string(),
                    message: format!("{secs} is not a non-negative number of seconds"),
                });
            }
        }
        if let (Some(correct), Some(total)) = (self.questions_correct, self.questions_total) {
            if correct > total {
                return Err(ValidationError::InvalidValue {
                    field: "questionsCorrect".to_string(),
                    message: format!("{correct} correct answers out of {total} questions"),
                });
            }
        }
        Ok(())
    }
}

/// Minutes between `start` and `end`, rounded up so any positive span is at
/// least one minute.
fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u32, ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }
    let span = end - start;
    let whole = span.num_minutes();
    let minutes = if span > Duration::minutes(whole) { whole + 1 } else { whole };
    u32::try_from(minutes).map_err(|_| ValidationError::InvalidValue {
        field: "duration".to_string(),
        message: "session spans more minutes than can be represented".to_string(),
    })
}

/// A session attempt awaiting validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCandidate {
    id: String,
    track_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration: u32,
    quiz: QuizResult,
}

impl SessionCandidate {
    /// Build a candidate from its time range.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidTimeRange`] if `end_time` is not after
    /// `start_time`.
    pub fn new(
        id: impl Into<String>,
        track_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: id.into(),
            track_id: track_id.into(),
            start_time,
            end_time,
            duration: duration_minutes(start_time, end_time)?,
            quiz: QuizResult::default(),
        })
    }

    /// Attach quiz metrics.
    ///
    /// # Errors
    /// Returns an error if the score is outside 0-100, the response time is
    /// negative, or more answers are correct than were asked.
    pub fn with_quiz(mut self, quiz: QuizResult) -> Result<Self, ValidationError> {
        quiz.check()?;
        self.quiz = quiz;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Minutes between start and end, rounded up.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Exact time between start and end.
    pub fn span(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn quiz(&self) -> &QuizResult {
        &self.quiz
    }
}

/// A stored learning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    id: String,
    track_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration: u32,
    is_valid: bool,
    #[serde(flatten)]
    quiz: QuizResult,
}

impl SessionRecord {
    /// Turn a judged candidate into a record.
    ///
    /// This is the only place the validity flag is written. Storage layers use
    /// it to rehydrate records with the flag that was decided when the session
    /// was first submitted.
    pub fn new(candidate: SessionCandidate, is_valid: bool) -> Self {
        Self {
            id: candidate.id,
            track_id: candidate.track_id,
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            duration: candidate.duration,
            is_valid,
            quiz: candidate.quiz,
        }
    }

    /// Check the invariants of a record that arrived over the wire.
    ///
    /// # Errors
    /// Returns an error if the time range is inverted, the stored duration
    /// disagrees with the timestamps, or the quiz metrics are out of range.
    pub fn check(&self) -> Result<(), ValidationError> {
        let derived = duration_minutes(self.start_time, self.end_time)?;
        if derived != self.duration {
            return Err(ValidationError::DurationMismatch {
                id: self.id.clone(),
                stored: self.duration,
                derived,
            });
        }
        self.quiz.check()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Minutes between start and end, rounded up.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn quiz(&self) -> &QuizResult {
        &self.quiz
    }
}
