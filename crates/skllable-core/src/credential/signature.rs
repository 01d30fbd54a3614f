//! HMAC signatures over issued credentials.
//!
//! An issued credential carries a signature over every other field, so a
//! registry can detect records that were edited after issuance.

use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::id::CredentialId;
use super::issue::{Credential, CredentialStats};
use super::level::CredentialLevel;

type HmacSha256 = Hmac<Sha256>;

/// Fields covered by the signature, in canonical order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayloadToSign<'a> {
    pub id: &'a CredentialId,
    pub track_id: &'a str,
    pub track_title: &'a str,
    pub level: CredentialLevel,
    pub learner_name: &'a str,
    pub earned_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub stats: &'a CredentialStats,
}

impl<'a> PayloadToSign<'a> {
    pub fn of(credential: &'a Credential) -> Self {
        Self {
            id: &credential.id,
            track_id: &credential.track_id,
            track_title: &credential.track_title,
            level: credential.level,
            learner_name: &credential.learner_name,
            earned_date: credential.earned_date,
            valid_until: credential.valid_until,
            stats: &credential.stats,
        }
    }
}

/// Signs and checks credential records with a shared key.
#[derive(Clone)]
pub struct CredentialSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner").finish_non_exhaustive()
    }
}

impl CredentialSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Derive a signing key from a configured seed.
    pub fn from_seed(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(b"skllable-credential-key-v1");
        Self::new(hasher.finalize().to_vec())
    }

    /// Hex-encoded HMAC-SHA256 of the payload.
    pub(crate) fn sign(&self, payload: &PayloadToSign<'_>) -> Result<String, serde_json::Error> {
        let payload_json = serde_json::to_string(payload)?;
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take keys of any size");
        mac.update(payload_json.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Whether the credential's signature matches its contents.
    pub fn verify(&self, credential: &Credential) -> bool {
        let Ok(expected) = self.sign(&PayloadToSign::of(credential)) else {
            return false;
        };
        let actual = credential.signature.as_bytes();
        if actual.len() != expected.len() {
            return false;
        }

        // constant time
        let mut diff = 0u8;
        for (a, b) in actual.iter().zip(expected.bytes()) {
            diff |= a ^ b;
        }
        diff == 0
    }
}
