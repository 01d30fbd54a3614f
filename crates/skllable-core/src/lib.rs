//! # Skllable Core Library
//!
//! Rule engine behind the Skllable learning app: it decides whether a learning
//! session counts, how long a learner's streak is, which credential tiers they
//! have earned, and which badges they hold. The `skllable-cli` binary is a thin
//! JSON front end over the same library.
//!
//! ## Architecture
//!
//! - **Sessions**: integrity validation and quality scoring of submitted sessions
//! - **Streaks**: consecutive-day and windowed activity metrics over local dates
//! - **Credentials**: Intent / Practice / Performance eligibility, issuance,
//!   verification codes and signed records
//! - **Badges**: criterion evaluation, the built-in catalog and the point ladder
//! - **Storage**: TOML configuration and session history sources
//!
//! Every evaluator is a pure function of the history it is handed. The current
//! instant and any randomness are always passed in by the caller.
//!
//! ## Key Components
//!
//! - [`SessionValidator`]: accepts or rejects a session candidate
//! - [`StreakCalculator`]: streak and active-day metrics
//! - [`CredentialEvaluator`]: tier eligibility with progress numbers
//! - [`CredentialIssuer`]: signed credential records
//! - [`BadgeCatalog`]: badge definitions checked against [`UserStats`]
//! - [`Config`]: application configuration management

pub mod badge;
pub mod calendar;
pub mod credential;
pub mod error;
pub mod session;
pub mod storage;
pub mod streak;

#[cfg(test)]
mod testing;

pub use badge::{
    check_badge_eligibility, current_tier, next_tier, BadgeCatalog, BadgeDefinition, Criterion,
    EarnedBadge, PointTier, UserStats,
};
pub use calendar::LocalCalendar;
pub use credential::{
    generate_credential_id, validate_credential_format, Credential, CredentialEvaluator,
    CredentialId, CredentialIssuer, CredentialLevel, CredentialSigner,
};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use session::{QualityScore, SessionCandidate, SessionRecord, SessionValidator, SessionVerdict};
pub use storage::{Config, SessionStore};
pub use streak::StreakCalculator;
