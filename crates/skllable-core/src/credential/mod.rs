//! Credentials: tier eligibility, issuance, IDs and verification.

mod eligibility;
mod id;
mod issue;
mod level;
mod registry;
mod share;
mod signature;
mod timeline;

pub use eligibility::{CredentialEvaluator, CredentialTierState, IntentEligibility, WindowEligibility};
pub use id::{
    generate_credential_id, validate_credential_format, CredentialId, FormatCheck,
    INVALID_FORMAT_REASON, SUFFIX_LEN,
};
pub use issue::{Credential, CredentialIssuer, CredentialStats, IssueRequest, DEFAULT_VALIDITY_DAYS};
pub use level::{
    CredentialLevel, TierRequirement, WindowRule, INTENT_STREAK_DAYS, PERFORMANCE_RULE, PRACTICE_RULE,
};
pub use registry::{
    verify_credential, CredentialRegistry, InMemoryRegistry, VerificationFailure,
    VerificationOutcome,
};
pub use share::{linkedin_share_url, verification_url};
pub use signature::CredentialSigner;
pub use timeline::{generate_timeline, verification_page, TimelineWeek, VerificationPage};

#[cfg(test)]
pub(crate) use issue::tests as tests_support;
