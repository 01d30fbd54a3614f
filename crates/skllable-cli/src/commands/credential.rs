use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use serde::Serialize;
use skllable_core::credential::{
    generate_timeline, linkedin_share_url, verification_page, verify_credential, InMemoryRegistry,
    IssueRequest,
};
use skllable_core::storage::JsonSessionFile;
use skllable_core::{Credential, CredentialId, CredentialLevel, SessionStore};

use crate::context::{print_json, read_json_list, write_json, Context};

#[derive(Subcommand)]
pub enum CredentialAction {
    /// Show progress toward every tier (or one) on a track
    Check {
        /// Stored sessions (JSON array)
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        track: String,
        /// Intent, Practice or Performance
        #[arg(long)]
        level: Option<CredentialLevel>,
    },
    /// Generate a verification code
    Id {
        #[arg(long)]
        track: String,
        #[arg(long)]
        level: CredentialLevel,
    },
    /// Check the shape of a verification code, or verify it against a registry
    Verify {
        id: String,
        /// Issued credentials (JSON array)
        #[arg(long)]
        registry: Option<PathBuf>,
    },
    /// Weekly activity since a date
    Timeline {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        track: String,
        /// Earned date (YYYY-MM-DD)
        #[arg(long)]
        since: NaiveDate,
    },
    /// Public page data for an issued credential
    Page {
        id: String,
        #[arg(long)]
        registry: PathBuf,
        #[arg(long)]
        history: PathBuf,
    },
    /// Issue a credential for an eligible track
    Issue {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        track: String,
        /// Track display name
        #[arg(long)]
        title: String,
        #[arg(long)]
        learner: String,
        #[arg(long)]
        level: CredentialLevel,
        /// Append the issued credential to this registry file
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueOutput {
    credential: Credential,
    share_url: String,
}

fn load_registry(path: Option<&PathBuf>) -> Result<(InMemoryRegistry, Vec<Credential>), Box<dyn std::error::Error>> {
    let credentials: Vec<Credential> = read_json_list(path.map(PathBuf::as_path))?;
    Ok((credentials.iter().cloned().collect(), credentials))
}

pub fn run(action: CredentialAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CredentialAction::Check {
            history,
            track,
            level,
        } => {
            let sessions = JsonSessionFile::new(history).sessions_for_track(&track)?;
            let evaluator = ctx.config.evaluator()?;
            match level {
                Some(level) => print_json(&evaluator.tier_state(level, &sessions, ctx.now))?,
                None => print_json(&evaluator.evaluate_all(&sessions, ctx.now))?,
            }
        }
        CredentialAction::Id { track, level } => {
            let id = CredentialId::generate(&track, level, ctx.now.year(), &mut rand::thread_rng());
            if !skllable_core::validate_credential_format(id.as_str()).is_valid {
                return Err(format!("track '{track}' does not yield a valid credential ID ({id})").into());
            }
            print_json(&id)?;
        }
        CredentialAction::Verify { id, registry } => match registry {
            Some(path) => {
                let (registry, _) = load_registry(Some(&path))?;
                let signer = ctx.config.signer();
                let outcome = verify_credential(&id, &registry, Some(&signer), ctx.now, &ctx.calendar()?);
                print_json(&outcome)?;
            }
            None => print_json(&skllable_core::validate_credential_format(&id))?,
        },
        CredentialAction::Timeline {
            history,
            track,
            since,
        } => {
            let sessions = JsonSessionFile::new(history).sessions_for_track(&track)?;
            print_json(&generate_timeline(&sessions, since, ctx.now, &ctx.calendar()?))?;
        }
        CredentialAction::Page {
            id,
            registry,
            history,
        } => {
            let (_, credentials) = load_registry(Some(&registry))?;
            let id = CredentialId::parse(&id).map_err(|check| check.reason.unwrap_or_default())?;
            let credential = credentials
                .iter()
                .find(|c| c.id() == &id)
                .ok_or_else(|| format!("credential {id} not found"))?;
            let sessions = JsonSessionFile::new(history).all_sessions()?;
            print_json(&verification_page(credential, &sessions, ctx.now, &ctx.calendar()?))?;
        }
        CredentialAction::Issue {
            history,
            track,
            title,
            learner,
            level,
            registry,
        } => {
            let sessions = JsonSessionFile::new(history).all_sessions()?;
            let request = IssueRequest {
                track_id: &track,
                track_title: &title,
                learner_name: &learner,
                level,
            };
            let credential = ctx
                .config
                .issuer()?
                .issue(&request, &sessions, ctx.now, &mut rand::thread_rng())?;

            if let Some(path) = registry {
                let (_, mut credentials) = load_registry(Some(&path))?;
                credentials.push(credential.clone());
                write_json(&path, &credentials)?;
            }

            let share_url = linkedin_share_url(&credential)?.to_string();
            print_json(&IssueOutput {
                credential,
                share_url,
            })?;
        }
    }
    Ok(())
}
