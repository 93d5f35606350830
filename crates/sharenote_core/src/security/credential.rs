//! Salted-hash password credential codec.
//!
//! # Responsibility
//! - Produce `"<saltHex>:<hashHex>"` credentials from plaintext passwords.
//! - Verify plaintext against stored credentials, dispatching on the stored
//!   shape.
//!
//! # Invariants
//! - `from_password` always yields a salted credential.
//! - Parsing a stored value never fails: anything without the `:` separator
//!   is treated as a legacy plaintext record, not an error.
//! - Debug/log output never exposes credential material.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Formatter};

/// Salt length in raw bytes before hex encoding.
const SALT_LEN: usize = 32;

/// Separator between the hex salt and the hex digest in stored form.
const SEPARATOR: char = ':';

/// Persisted representation of a password.
///
/// `Salted` is the only shape this crate produces. `LegacyPlain` is a one-way
/// compatibility bridge for accounts created before salted hashing existed:
/// it lets those accounts keep logging in, and nothing else. Accounts are
/// never updated by this crate, so a legacy record stays legacy until an
/// outer migration rewrites it.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Hex salt plus hex SHA-256 digest over `saltHex || password`.
    Salted { salt_hex: String, hash_hex: String },
    /// Pre-migration plaintext record, verified by equality only.
    ///
    /// Deprecated compatibility bridge: kept so pre-salting accounts can
    /// still log in. Never produced for new credentials.
    LegacyPlain(String),
}

impl Credential {
    /// Hashes a plaintext password into a fresh salted credential.
    ///
    /// # Side effects
    /// - Draws salt bytes from the OS entropy source. An unavailable entropy
    ///   source aborts the process; no credential can be safely issued
    ///   without it.
    pub fn from_password(plaintext: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt_hex = hex::encode(salt);
        let hash_hex = digest_hex(&salt_hex, plaintext);
        Self::Salted { salt_hex, hash_hex }
    }

    /// Parses a stored credential string.
    ///
    /// Splits on the first `:`. A value without the separator is a legacy
    /// plaintext record; this is a deliberate non-throwing path so malformed
    /// rows degrade to a non-match instead of an error.
    pub fn parse(stored: &str) -> Self {
        match stored.split_once(SEPARATOR) {
            Some((salt_hex, hash_hex)) => Self::Salted {
                salt_hex: salt_hex.to_string(),
                hash_hex: hash_hex.to_string(),
            },
            None => Self::LegacyPlain(stored.to_string()),
        }
    }

    /// Verifies a plaintext password against this credential.
    ///
    /// Salted records recompute the digest with the stored salt; legacy
    /// records compare plaintext equality.
    pub fn verify(&self, plaintext: &str) -> bool {
        match self {
            Self::Salted { salt_hex, hash_hex } => digest_hex(salt_hex, plaintext) == *hash_hex,
            Self::LegacyPlain(stored) => stored == plaintext,
        }
    }

    /// Returns whether this is a pre-migration plaintext record.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyPlain(_))
    }

    /// Renders the storable string form.
    pub fn as_stored_string(&self) -> String {
        match self {
            Self::Salted { salt_hex, hash_hex } => format!("{salt_hex}{SEPARATOR}{hash_hex}"),
            Self::LegacyPlain(stored) => stored.clone(),
        }
    }
}

fn digest_hex(salt_hex: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Redacted: a legacy variant holds the plaintext password itself, and even
/// the salted hash has no business in logs or panic payloads.
impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Salted { .. } => write!(f, "Credential::Salted(..)"),
            Self::LegacyPlain(_) => write!(f, "Credential::LegacyPlain(..)"),
        }
    }
}

/// Serializes as the storable string form.
impl Serialize for Credential {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_stored_string())
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = String::deserialize(deserializer)?;
        if stored.is_empty() {
            return Err(D::Error::custom("credential string must not be empty"));
        }
        Ok(Credential::parse(&stored))
    }
}
