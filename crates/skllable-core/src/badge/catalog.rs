//! Badge definitions and the built-in catalog.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::criteria::{Criterion, Timeframe};
use super::tier::PointTier;

/// How rare a badge is meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for BadgeRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BadgeRarity::Common => "Common",
            BadgeRarity::Uncommon => "Uncommon",
            BadgeRarity::Rare => "Rare",
            BadgeRarity::Epic => "Epic",
            BadgeRarity::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// A badge that can be earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tier: PointTier,
    pub points: u32,
    pub rarity: BadgeRarity,
    pub category: String,
    pub criteria: Criterion,
}

/// An ordered set of badge definitions with lookup helpers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    definitions: Vec<BadgeDefinition>,
}

static BUILTIN: Lazy<BadgeCatalog> = Lazy::new(|| BadgeCatalog::new(builtin_definitions()));

impl BadgeCatalog {
    pub fn new(definitions: Vec<BadgeDefinition>) -> Self {
        Self { definitions }
    }

    /// The eighteen badges shipped with the app.
    pub fn builtin() -> &'static BadgeCatalog {
        &BUILTIN
    }

    pub fn all(&self) -> &[BadgeDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.definitions.iter().find(|b| b.id == id)
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a BadgeDefinition> {
        self.definitions.iter().filter(move |b| b.category == category)
    }

    pub fn by_tier(&self, tier: PointTier) -> impl Iterator<Item = &BadgeDefinition> {
        self.definitions.iter().filter(move |b| b.tier == tier)
    }

    pub fn by_rarity(&self, rarity: BadgeRarity) -> impl Iterator<Item = &BadgeDefinition> {
        self.definitions.iter().filter(move |b| b.rarity == rarity)
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for badge in &self.definitions {
            if !seen.contains(&badge.category.as_str()) {
                seen.push(&badge.category);
            }
        }
        seen
    }
}

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    tier: PointTier,
    points: u32,
    rarity: BadgeRarity,
    category: &'static str,
    criteria: Criterion,
}

impl From<Entry> for BadgeDefinition {
    fn from(e: Entry) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title.to_string(),
            description: e.description.to_string(),
            tier: e.tier,
            points: e.points,
            rarity: e.rarity,
            category: e.category.to_string(),
            criteria: e.criteria,
        }
    }
}

fn builtin_definitions() -> Vec<BadgeDefinition> {
    use BadgeRarity::*;
    use PointTier::*;

    let entries = vec![
        // Bronze: getting started
        Entry {
            id: "first-session",
            title: "First Steps",
            description: "Completed your first learning session",
            tier: Bronze,
            points: 10,
            rarity: Common,
            category: "Getting Started",
            criteria: Criterion::sessions_at_least(1),
        },
        Entry {
            id: "early-bird",
            title: "Early Bird",
            description: "Completed a session before 9 AM",
            tier: Bronze,
            points: 15,
            rarity: Common,
            category: "Habits",
            criteria: Criterion::sessions_at_least(1),
        },
        Entry {
            id: "quiz-starter",
            title: "Quiz Starter",
            description: "Answered your first 10 quiz questions",
            tier: Bronze,
            points: 10,
            rarity: Common,
            category: "Learning",
            criteria: Criterion::quiz_score_at_least(10.0),
        },
        // Silver: building habits
        Entry {
            id: "week-warrior",
            title: "Week Warrior",
            description: "Maintained a 7-day learning streak",
            tier: Silver,
            points: 25,
            rarity: Common,
            category: "Consistency",
            criteria: Criterion::streak_at_least(7),
        },
        Entry {
            id: "quiz-ace",
            title: "Quiz Ace",
            description: "Achieved 90%+ score on 5 consecutive quizzes",
            tier: Silver,
            points: 30,
            rarity: Uncommon,
            category: "Excellence",
            criteria: Criterion::quiz_score_at_least(90.0),
        },
        Entry {
            id: "time-keeper",
            title: "Time Keeper",
            description: "Accumulated 10 hours of learning time",
            tier: Silver,
            points: 35,
            rarity: Common,
            category: "Dedication",
            criteria: Criterion::time_at_least(600, Timeframe::AllTime),
        },
        // Gold: serious commitment
        Entry {
            id: "intent-master",
            title: "Intent Master",
            description: "Earned your first Intent credential",
            tier: Gold,
            points: 50,
            rarity: Uncommon,
            category: "Credentials",
            criteria: Criterion::credentials_at_least(1),
        },
        Entry {
            id: "multi-track",
            title: "Multi-Track Master",
            description: "Active in 2+ tracks simultaneously",
            tier: Gold,
            points: 75,
            rarity: Uncommon,
            category: "Exploration",
            criteria: Criterion::sessions_at_least(2),
        },
        Entry {
            id: "consistency-champion",
            title: "Consistency Champion",
            description: "Maintained 21-day streak with 85%+ quiz average",
            tier: Gold,
            points: 100,
            rarity: Rare,
            category: "Excellence",
            criteria: Criterion::Consistency { value: 21 },
        },
        // Platinum: advanced achievement
        Entry {
            id: "practice-pioneer",
            title: "Practice Pioneer",
            description: "Earned your first Practice credential",
            tier: Platinum,
            points: 100,
            rarity: Rare,
            category: "Credentials",
            criteria: Criterion::credentials_at_least(1),
        },
        Entry {
            id: "marathon-learner",
            title: "Marathon Learner",
            description: "Completed 100+ learning sessions",
            tier: Platinum,
            points: 150,
            rarity: Rare,
            category: "Dedication",
            criteria: Criterion::sessions_at_least(100),
        },
        Entry {
            id: "speed-demon",
            title: "Speed Demon",
            description: "Completed 50 hours of learning in 30 days",
            tier: Platinum,
            points: 125,
            rarity: Epic,
            category: "Intensity",
            criteria: Criterion::time_at_least(3000, Timeframe::Month),
        },
        // Diamond: elite performance
        Entry {
            id: "perfect-month",
            title: "Perfect Month",
            description: "Maintained 30-day streak with 90%+ quiz scores",
            tier: Diamond,
            points: 200,
            rarity: Epic,
            category: "Excellence",
            criteria: Criterion::Consistency { value: 30 },
        },
        Entry {
            id: "triple-threat",
            title: "Triple Threat",
            description: "Earned Practice credentials in 3 different tracks",
            tier: Diamond,
            points: 250,
            rarity: Epic,
            category: "Mastery",
            criteria: Criterion::credentials_at_least(3),
        },
        Entry {
            id: "centurion",
            title: "Centurion",
            description: "Accumulated 100+ hours of learning time",
            tier: Diamond,
            points: 300,
            rarity: Legendary,
            category: "Dedication",
            criteria: Criterion::time_at_least(6000, Timeframe::AllTime),
        },
        // Challenger: legendary status
        Entry {
            id: "knowledge-champion",
            title: "Knowledge Champion",
            description: "Achieved 95%+ average quiz score across all tracks",
            tier: Challenger,
            points: 300,
            rarity: Legendary,
            category: "Mastery",
            criteria: Criterion::quiz_score_at_least(95.0),
        },
        Entry {
            id: "performance-master",
            title: "Performance Master",
            description: "Earned Performance credential in any track",
            tier: Challenger,
            points: 400,
            rarity: Legendary,
            category: "Credentials",
            criteria: Criterion::credentials_at_least(1),
        },
        Entry {
            id: "legend",
            title: "Legend",
            description: "Maintained 365-day learning streak",
            tier: Challenger,
            points: 500,
            rarity: Legendary,
            category: "Consistency",
            criteria: Criterion::streak_at_least(365),
        },
    ];

    entries.into_iter().map(BadgeDefinition::from).collect()
}
