//! User account model.
//!
//! # Responsibility
//! - Define the user record held by the directory.
//!
//! # Invariants
//! - `id` is stable and never reused for another account.
//! - `email` is the unique, case-sensitive login identifier.
//! - `credential` never holds a plaintext password for accounts created by
//!   this crate; see [`crate::security::Credential`] for the legacy shape.

use crate::security::Credential;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a user account.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = Uuid;

/// User account record as held by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account ID referenced by note owner sets.
    pub id: UserId,
    /// Login identifier. Unique across the directory, compared case-sensitively.
    pub email: String,
    /// Persisted password credential, never the plaintext.
    pub credential: Credential,
}

/// Validation failure for user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email is empty or whitespace-only.
    BlankEmail,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEmail => write!(f, "user email must not be blank"),
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates a user with a generated stable ID.
    pub fn new(email: impl Into<String>, credential: Credential) -> Self {
        Self::with_id(Uuid::new_v4(), email, credential)
    }

    /// Creates a user with a caller-provided stable ID.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(id: UserId, email: impl Into<String>, credential: Credential) -> Self {
        Self {
            id,
            email: email.into(),
            credential,
        }
    }

    /// Checks record-level invariants before persistence.
    ///
    /// Email format is deliberately not validated beyond non-blank; the
    /// directory only requires a stable, unique login string.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.email.trim().is_empty() {
            return Err(UserValidationError::BlankEmail);
        }
        Ok(())
    }
}
