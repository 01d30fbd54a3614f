use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod telemetry;

use context::Context;

#[derive(Parser)]
#[command(name = "skllable-cli", version, about = "Skllable CLI")]
struct Cli {
    /// Config file (defaults to ~/.config/skllable/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as of this instant (RFC 3339) instead of the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session validation
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Credential eligibility, issuance and verification
    Credential {
        #[command(subcommand)]
        action: commands::credential::CredentialAction,
    },
    /// Badges and point tiers
    Badge {
        #[command(subcommand)]
        action: commands::badge::BadgeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config, cli.now) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init(&ctx.config.logging.level) {
        eprintln!("warning: {e}");
    }

    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action, &ctx),
        Commands::Credential { action } => commands::credential::run(action, &ctx),
        Commands::Badge { action } => commands::badge::run(action, &ctx),
        Commands::Config { action } => commands::config::run(action, ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
