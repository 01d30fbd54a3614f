use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use skllable_core::session::QuizResult;
use skllable_core::storage::JsonSessionFile;
use skllable_core::{SessionCandidate, SessionRecord, SessionStore, SessionVerdict};

use crate::context::{print_json, read_json, Context};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Validate a submitted session against the stored history
    Validate {
        /// Candidate session as JSON ("-" for stdin)
        candidate: PathBuf,
        /// Stored sessions (JSON array)
        #[arg(long)]
        history: Option<PathBuf>,
        /// Append the judged record to the history file
        #[arg(long, requires = "history")]
        record: bool,
    },
}

/// Candidate as submitted by a client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateInput {
    #[serde(default)]
    id: Option<String>,
    track_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(flatten)]
    quiz: QuizResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    #[serde(flatten)]
    verdict: SessionVerdict,
    record: SessionRecord,
}

pub fn run(action: SessionAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Validate {
            candidate,
            history,
            record,
        } => {
            let input: CandidateInput = read_json(&candidate)?;
            let id = input.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let candidate =
                SessionCandidate::new(id, input.track_id, input.start_time, input.end_time)?
                    .with_quiz(input.quiz)?;

            let store = history.map(JsonSessionFile::new);
            let prior = match &store {
                Some(store) => store.sessions_for_track(candidate.track_id())?,
                None => Vec::new(),
            };

            let (verdict, judged) = ctx.config.validator().finalize(candidate, &prior);
            if let (true, Some(store)) = (record, &store) {
                store.append(judged.clone())?;
            }

            print_json(&ValidateOutput {
                verdict,
                record: judged,
            })?;
        }
    }
    Ok(())
}
