//! Learning sessions: records, quality scoring and integrity validation.

mod quality;
mod record;
mod validator;

pub use quality::{
    average_quality, response_time_component, QualityScore, QUALITY_CEILING, QUALITY_FLOOR,
    UNGRADED_AGGREGATE_QUALITY,
};
pub use record::{QuizResult, SessionCandidate, SessionRecord};
pub use validator::{RejectionReason, SessionValidator, SessionVerdict, ValidationRules};
