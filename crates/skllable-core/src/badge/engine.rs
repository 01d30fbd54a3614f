//! Awarding badges and ranking earned points.
//!
//! Earned badges are permanent: re-evaluation only ever adds badges, it never
//! takes one away because a statistic dropped.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{BadgeCatalog, BadgeDefinition};
use super::stats::UserStats;
use super::tier::{current_tier, next_tier, points_to_next, PointTier};

/// A badge together with when it was earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub definition: BadgeDefinition,
    pub earned_date: DateTime<Utc>,
}

impl EarnedBadge {
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn points(&self) -> u32 {
        self.definition.points
    }
}

/// Whether `stats` satisfies the badge's criterion.
pub fn check_badge_eligibility(definition: &BadgeDefinition, stats: &UserStats) -> bool {
    definition.criteria.is_met(stats)
}

/// Mark `definition` as earned at `earned_at`.
pub fn award_badge(definition: &BadgeDefinition, earned_at: DateTime<Utc>) -> EarnedBadge {
    tracing::info!(badge = %definition.id, points = definition.points, "badge awarded");
    EarnedBadge {
        definition: definition.clone(),
        earned_date: earned_at,
    }
}

/// Sum of points over earned badges.
pub fn calculate_total_points(earned: &[EarnedBadge]) -> u32 {
    earned
        .iter()
        .fold(0u32, |total, badge| total.saturating_add(badge.points()))
}

/// Badges from `catalog` that `stats` newly qualifies for.
///
/// Badges already in `earned` are skipped whether or not they would still
/// qualify.
pub fn evaluate_catalog(
    catalog: &BadgeCatalog,
    stats: &UserStats,
    earned: &[EarnedBadge],
    now: DateTime<Utc>,
) -> Vec<EarnedBadge> {
    let held: HashSet<&str> = earned.iter().map(EarnedBadge::id).collect();

    catalog
        .all()
        .iter()
        .filter(|definition| !held.contains(definition.id.as_str()))
        .filter(|definition| check_badge_eligibility(definition, stats))
        .map(|definition| award_badge(definition, now))
        .collect()
}

/// Summary of a learner's standing on the point ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub total_points: u32,
    pub current_tier: PointTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_tier: Option<PointTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_to_next: Option<u32>,
    pub earned_count: usize,
    pub available_count: usize,
}

impl BadgeProgress {
    pub fn from_earned(earned: &[EarnedBadge], catalog: &BadgeCatalog) -> Self {
        let total_points = calculate_total_points(earned);
        let held: HashSet<&str> = earned.iter().map(EarnedBadge::id).collect();

        Self {
            total_points,
            current_tier: current_tier(total_points),
            next_tier: next_tier(total_points),
            points_to_next: points_to_next(total_points),
            earned_count: held.len(),
            available_count: catalog
                .all()
                .iter()
                .filter(|b| !held.contains(b.id.as_str()))
                .count(),
        }
    }
}
