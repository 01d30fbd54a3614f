use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use skllable_core::badge::{
    current_tier, evaluate_catalog, next_tier, points_to_next, BadgeProgress, TierInfo,
};
use skllable_core::storage::JsonSessionFile;
use skllable_core::{
    BadgeCatalog, BadgeDefinition, Credential, EarnedBadge, PointTier, SessionStore, UserStats,
};

use crate::context::{print_json, read_json_list, write_json, Context};

#[derive(Subcommand)]
pub enum BadgeAction {
    /// Award every badge the learner now qualifies for
    Check {
        /// Stored sessions (JSON array)
        #[arg(long)]
        history: PathBuf,
        /// Issued credentials (JSON array)
        #[arg(long)]
        credentials: Option<PathBuf>,
        /// Badges already earned; newly earned ones are appended
        #[arg(long)]
        earned: Option<PathBuf>,
    },
    /// List the built-in badges
    Catalog {
        #[arg(long)]
        tier: Option<PointTier>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        rarity: Option<String>,
    },
    /// Show the point-tier ladder, or where a point total sits on it
    Tiers {
        #[arg(long)]
        points: Option<u32>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    stats: UserStats,
    newly_earned: Vec<EarnedBadge>,
    progress: BadgeProgress,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Standing {
    points: u32,
    current: TierInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<TierInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    points_to_next: Option<u32>,
}

pub fn run(action: BadgeAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = BadgeCatalog::builtin();

    match action {
        BadgeAction::Check {
            history,
            credentials,
            earned,
        } => {
            let sessions = JsonSessionFile::new(history).all_sessions()?;
            let credentials: Vec<Credential> = read_json_list(credentials.as_deref())?;
            let mut held: Vec<EarnedBadge> = read_json_list(earned.as_deref())?;

            let stats = UserStats::aggregate(&sessions, &credentials, ctx.now, &ctx.calendar()?);
            let newly_earned = evaluate_catalog(catalog, &stats, &held, ctx.now);
            held.extend(newly_earned.iter().cloned());

            if let (Some(path), false) = (&earned, newly_earned.is_empty()) {
                write_json(path, &held)?;
            }

            print_json(&CheckOutput {
                stats,
                newly_earned,
                progress: BadgeProgress::from_earned(&held, catalog),
            })?;
        }
        BadgeAction::Catalog {
            tier,
            category,
            rarity,
        } => {
            let badges: Vec<&BadgeDefinition> = catalog
                .all()
                .iter()
                .filter(|b| tier.map_or(true, |t| b.tier == t))
                .filter(|b| category.as_deref().map_or(true, |c| b.category.eq_ignore_ascii_case(c)))
                .filter(|b| {
                    rarity
                        .as_deref()
                        .map_or(true, |r| b.rarity.to_string().eq_ignore_ascii_case(r))
                })
                .collect();
            print_json(&badges)?;
        }
        BadgeAction::Tiers { points } => match points {
            Some(points) => print_json(&Standing {
                points,
                current: current_tier(points).info(),
                next: next_tier(points).map(PointTier::info),
                points_to_next: points_to_next(points),
            })?,
            None => {
                let ladder: Vec<TierInfo> = PointTier::ALL.iter().map(|t| t.info()).collect();
                print_json(&ladder)?;
            }
        },
    }
    Ok(())
}
