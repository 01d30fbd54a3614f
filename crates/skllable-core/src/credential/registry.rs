//! Credential authenticity checks.
//!
//! A well-formed ID says nothing about whether the credential exists. The
//! [`CredentialRegistry`] trait is the seam where a real lookup (a database, a
//! remote verification service) plugs in; [`InMemoryRegistry`] is the
//! reference implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::{CredentialId, INVALID_FORMAT_REASON};
use super::issue::Credential;
use super::signature::CredentialSigner;
use crate::calendar::LocalCalendar;

/// Source of issued credentials.
pub trait CredentialRegistry {
    /// Find the credential with this ID, if it was ever issued.
    fn lookup(&self, id: &CredentialId) -> Option<Credential>;
}

/// Why a verification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFailure {
    InvalidFormat,
    NotFound,
    SignatureMismatch,
    Expired,
}

impl VerificationFailure {
    pub fn message(self) -> &'static str {
        match self {
            VerificationFailure::InvalidFormat => INVALID_FORMAT_REASON,
            VerificationFailure::NotFound => "Credential not found",
            VerificationFailure::SignatureMismatch => "Credential signature mismatch",
            VerificationFailure::Expired => "Credential expired",
        }
    }
}

/// Outcome of verifying a credential ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<VerificationFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
}

impl VerificationOutcome {
    fn failed(failure: VerificationFailure, credential: Option<Credential>) -> Self {
        Self {
            is_valid: false,
            failure: Some(failure),
            reason: Some(failure.message().to_string()),
            credential,
        }
    }
}

/// Verify `raw_id` against a registry.
///
/// Checks, in order: ID shape, existence, signature (when a signer is given)
/// and expiry as of `now`. Expired credentials are returned alongside the
/// failure so callers can still display them.
pub fn verify_credential<R: CredentialRegistry + ?Sized>(
    raw_id: &str,
    registry: &R,
    signer: Option<&CredentialSigner>,
    now: DateTime<Utc>,
    calendar: &LocalCalendar,
) -> VerificationOutcome {
    let Ok(id) = CredentialId::parse(raw_id) else {
        return VerificationOutcome::failed(VerificationFailure::InvalidFormat, None);
    };

    let Some(credential) = registry.lookup(&id) else {
        tracing::debug!(id = %id, "credential lookup missed");
        return VerificationOutcome::failed(VerificationFailure::NotFound, None);
    };

    if let Some(signer) = signer {
        if !signer.verify(&credential) {
            tracing::warn!(id = %id, "credential signature mismatch");
            return VerificationOutcome::failed(VerificationFailure::SignatureMismatch, None);
        }
    }

    if !credential.is_active(now, calendar) {
        return VerificationOutcome::failed(VerificationFailure::Expired, Some(credential));
    }

    VerificationOutcome {
        is_valid: true,
        failure: None,
        reason: None,
        credential: Some(credential),
    }
}

/// Registry backed by a map, for tests and single-process use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    credentials: HashMap<CredentialId, Credential>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, credential: Credential) {
        self.credentials.insert(credential.id().clone(), credential);
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl FromIterator<Credential> for InMemoryRegistry {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        let mut registry = Self::new();
        for credential in iter {
            registry.insert(credential);
        }
        registry
    }
}

impl CredentialRegistry for InMemoryRegistry {
    fn lookup(&self, id: &CredentialId) -> Option<Credential> {
        self.credentials.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::issue::tests::sample_credential;
    use crate::testing::now;
    use chrono::Duration;

    fn setup() -> (CredentialSigner, Credential, InMemoryRegistry) {
        let signer = CredentialSigner::from_seed("registry");
        let credential = sample_credential(&signer);
        let registry: InMemoryRegistry = std::iter::once(credential.clone()).collect();
        (signer, credential, registry)
    }

    #[test]
    fn verifies_issued_credential() {
        let (signer, credential, registry) = setup();
        let outcome = verify_credential(
            credential.id().as_str(),
            &registry,
            Some(&signer),
            now(),
            &LocalCalendar::utc(),
        );
        assert!(outcome.is_valid);
        assert_eq!(outcome.credential.as_ref(), Some(&credential));
    }

    #[test]
    fn lower_case_input_is_accepted() {
        let (signer, credential, registry) = setup();
        let typed = credential.id().as_str().to_lowercase();
        let outcome = verify_credential(&typed, &registry, Some(&signer), now(), &LocalCalendar::utc());
        assert!(outcome.is_valid);
    }

    #[test]
    fn malformed_id_is_rejected_before_lookup() {
        let (signer, _, registry) = setup();
        let outcome = verify_credential("bad-id", &registry, Some(&signer), now(), &LocalCalendar::utc());
        assert_eq!(outcome.failure, Some(VerificationFailure::InvalidFormat));
        assert_eq!(outcome.reason.as_deref(), Some("Invalid credential format"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (signer, _, registry) = setup();
        let outcome =
            verify_credential("DA-INT-2024-000000", &registry, Some(&signer), now(), &LocalCalendar::utc());
        assert_eq!(outcome.failure, Some(VerificationFailure::NotFound));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let (_, credential, registry) = setup();
        let other = CredentialSigner::from_seed("someone-else");
        let outcome = verify_credential(
            credential.id().as_str(),
            &registry,
            Some(&other),
            now(),
            &LocalCalendar::utc(),
        );
        assert_eq!(outcome.failure, Some(VerificationFailure::SignatureMismatch));
        assert!(outcome.credential.is_none());
    }

    #[test]
    fn expired_credential_is_reported_with_its_record() {
        let (signer, credential, registry) = setup();
        let later = now() + Duration::days(400);
        let outcome = verify_credential(
            credential.id().as_str(),
            &registry,
            Some(&signer),
            later,
            &LocalCalendar::utc(),
        );
        assert_eq!(outcome.failure, Some(VerificationFailure::Expired));
        assert!(outcome.credential.is_some());
    }

    #[test]
    fn signature_check_is_optional() {
        let (_, credential, registry) = setup();
        let outcome =
            verify_credential(credential.id().as_str(), &registry, None, now(), &LocalCalendar::utc());
        assert!(outcome.is_valid);
    }
}
