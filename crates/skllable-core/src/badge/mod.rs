//! Gamification badges and the point-tier ladder.
//!
//! Badges are separate from credentials: they reward varied milestones and
//! their points rank a learner from Bronze to Challenger.

mod catalog;
mod criteria;
mod engine;
mod stats;
mod tier;

pub use catalog::{BadgeCatalog, BadgeDefinition, BadgeRarity};
pub use criteria::{Comparison, Criterion, Timeframe, CONSISTENCY_MIN_QUIZ_AVERAGE};
pub use engine::{
    award_badge, calculate_total_points, check_badge_eligibility, evaluate_catalog, BadgeProgress,
    EarnedBadge,
};
pub use stats::{UserStats, RECENT_QUIZ_LIMIT};
pub use tier::{current_tier, next_tier, points_to_next, PointTier, TierInfo};
