//! Point tiers: the six-band ladder badge points are ranked on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A point band. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Challenger,
}

impl PointTier {
    /// Every tier, lowest first.
    pub const ALL: [PointTier; 6] = [
        PointTier::Bronze,
        PointTier::Silver,
        PointTier::Gold,
        PointTier::Platinum,
        PointTier::Diamond,
        PointTier::Challenger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PointTier::Bronze => "Bronze",
            PointTier::Silver => "Silver",
            PointTier::Gold => "Gold",
            PointTier::Platinum => "Platinum",
            PointTier::Diamond => "Diamond",
            PointTier::Challenger => "Challenger",
        }
    }

    /// Points needed to enter the tier.
    pub fn min_points(self) -> u32 {
        match self {
            PointTier::Bronze => 0,
            PointTier::Silver => 100,
            PointTier::Gold => 300,
            PointTier::Platinum => 600,
            PointTier::Diamond => 1000,
            PointTier::Challenger => 1500,
        }
    }

    /// Display colour as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            PointTier::Bronze => "#cd7f32",
            PointTier::Silver => "#c0c0c0",
            PointTier::Gold => "#ffd700",
            PointTier::Platinum => "#e5e4e2",
            PointTier::Diamond => "#b9f2ff",
            PointTier::Challenger => "#ff6b6b",
        }
    }

    pub fn benefits(self) -> &'static [&'static str] {
        match self {
            PointTier::Bronze => &["Basic achievement tracking", "Profile customization"],
            PointTier::Silver => &["Enhanced progress tracking", "Weekly insights"],
            PointTier::Gold => &["Advanced analytics", "Priority support"],
            PointTier::Platinum => &["Exclusive content access", "Mentorship opportunities"],
            PointTier::Diamond => &["Leadership board recognition", "Beta feature access"],
            PointTier::Challenger => &["Elite status", "Direct feedback channel", "Special events"],
        }
    }

    /// The tier above this one.
    pub fn next(self) -> Option<PointTier> {
        let index = PointTier::ALL.iter().position(|t| *t == self)?;
        PointTier::ALL.get(index + 1).copied()
    }

    pub fn info(self) -> TierInfo {
        TierInfo {
            name: self,
            color: self.color(),
            min_points: self.min_points(),
            benefits: self.benefits(),
        }
    }
}

impl fmt::Display for PointTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PointTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PointTier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "tier".to_string(),
                message: format!("unknown point tier '{s}'"),
            })
    }
}

/// Everything shown about a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierInfo {
    pub name: PointTier,
    pub color: &'static str,
    pub min_points: u32,
    pub benefits: &'static [&'static str],
}

/// Highest tier whose minimum is at most `points`.
pub fn current_tier(points: u32) -> PointTier {
    PointTier::ALL
        .into_iter()
        .rev()
        .find(|tier| points >= tier.min_points())
        .unwrap_or(PointTier::Bronze)
}

/// Tier after the current one; `None` at the top of the ladder.
pub fn next_tier(points: u32) -> Option<PointTier> {
    current_tier(points).next()
}

/// Points still needed to reach the next tier.
pub fn points_to_next(points: u32) -> Option<u32> {
    next_tier(points).map(|tier| tier.min_points().saturating_sub(points))
}
