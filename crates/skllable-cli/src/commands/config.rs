use clap::Subcommand;
use skllable_core::Config;

use crate::context::{print_json, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dotted key (e.g. "validation.cooldown_hours", "calendar.utc_offset_minutes")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Show the whole config
    Show,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, mut ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => match ctx.config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            ctx.config.set(&key, &value)?;
            ctx.save_config()?;
            println!("ok");
        }
        ConfigAction::Show => print_json(&ctx.config)?,
        ConfigAction::Reset => {
            ctx.config = Config::default();
            ctx.save_config()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
