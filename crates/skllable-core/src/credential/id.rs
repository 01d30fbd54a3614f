//! Credential verification codes.
//!
//! IDs look like `DA-INT-2024-789ABC`: a two-letter track code, a three-letter
//! level code, the issuance year and a six character random suffix. A
//! well-formed ID only proves its shape; authenticity needs a registry lookup
//! (see [`super::registry`]).

use std::fmt;

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::level::CredentialLevel;

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 6;

const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Reason reported for IDs that do not match the expected shape.
pub const INVALID_FORMAT_REASON: &str = "Invalid credential format";

// `[0-9]` rather than `\d`: the regex crate's `\d` also matches non-ASCII digits.
static CREDENTIAL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}-[A-Z]{3}-[0-9]{4}-[A-Z0-9]{6}$").expect("credential id pattern compiles")
});

/// A credential verification code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(String);

impl CredentialId {
    /// Build an ID for `track_id` and `level` issued in `year`.
    ///
    /// The track code is the first two characters of the track identifier,
    /// upper-cased; track identifiers that do not start with two letters give
    /// IDs that fail [`validate_credential_format`].
    pub fn generate<R: Rng + ?Sized>(
        track_id: &str,
        level: CredentialLevel,
        year: i32,
        rng: &mut R,
    ) -> Self {
        let track_code: String = track_id.chars().take(2).collect::<String>().to_uppercase();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
            .collect();

        Self(format!("{track_code}-{}-{year:04}-{suffix}", level.code()))
    }

    /// Wrap an existing code after checking its shape.
    ///
    /// Lower-case input is accepted and normalised, since suffixes are
    /// case-insensitive when typed back by a verifier.
    pub fn parse(raw: &str) -> Result<Self, FormatCheck> {
        let normalised = raw.trim().to_uppercase();
        let check = validate_credential_format(&normalised);
        if check.is_valid {
            Ok(Self(normalised))
        } else {
            Err(check)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Track code segment.
    pub fn track_code(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Issuance year segment, if the ID is well-formed.
    pub fn year(&self) -> Option<i32> {
        self.0.split('-').nth(2)?.parse().ok()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate an ID for the current year using the thread RNG.
pub fn generate_credential_id(track_id: &str, level: CredentialLevel) -> CredentialId {
    CredentialId::generate(track_id, level, Utc::now().year(), &mut rand::thread_rng())
}

/// Result of a shape check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Check that `id` matches `^[A-Z]{2}-[A-Z]{3}-\d{4}-[A-Z0-9]{6}$` exactly.
pub fn validate_credential_format(id: &str) -> FormatCheck {
    if CREDENTIAL_ID_RE.is_match(id) {
        FormatCheck {
            is_valid: true,
            reason: None,
        }
    } else {
        FormatCheck {
            is_valid: false,
            reason: Some(INVALID_FORMAT_REASON.to_string()),
        }
    }
}
