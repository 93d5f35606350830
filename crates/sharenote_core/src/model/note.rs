//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and the save-input draft shape.
//! - Enforce owner-set invariants on every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `owners` is non-empty and duplicate-free; a note whose last owner is
//!   removed is deleted outright, never kept as an empty-owner record.
//! - `created_at` is set by the store on insert; `updated_at` stays at its
//!   default until the first update.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Persisted note record with shared ownership.
///
/// The descriptive fields (`title`, `content`, `date`, `color`) are opaque to
/// core logic; only the owner set and timestamps carry semantics here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note ID.
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Display date string, opaque to core logic.
    pub date: String,
    /// Display color string, opaque to core logic.
    pub color: String,
    /// User IDs holding access to this note. Non-empty, duplicate-free.
    pub owners: Vec<UserId>,
    /// Insert timestamp in epoch milliseconds, set by the store.
    pub created_at: i64,
    /// Last-update timestamp in epoch milliseconds. 0 until first update.
    pub updated_at: i64,
}

/// Save-input shape for notes.
///
/// `id == None` requests an insert with a generated ID. A supplied ID that is
/// not yet stored behaves as an insert with that ID. The owner set is only
/// honored on insert; updates keep the stored owners (ownership changes go
/// through the dedicated operations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub owners: Vec<UserId>,
}

/// Validation failure for note owner sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Owner set is empty.
    NoOwners,
    /// Owner set contains the same user more than once.
    DuplicateOwner(UserId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOwners => write!(f, "note must have at least one owner"),
            Self::DuplicateOwner(id) => write!(f, "duplicate owner in note owner set: {id}"),
        }
    }
}

impl Error for NoteValidationError {}

/// Checks a prospective owner set for emptiness and duplicates.
pub fn validate_owners(owners: &[UserId]) -> Result<(), NoteValidationError> {
    if owners.is_empty() {
        return Err(NoteValidationError::NoOwners);
    }
    let mut seen = HashSet::with_capacity(owners.len());
    for owner in owners {
        if !seen.insert(*owner) {
            return Err(NoteValidationError::DuplicateOwner(*owner));
        }
    }
    Ok(())
}

impl Note {
    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_owners(&self.owners)
    }

    /// Returns whether `user_id` is in this note's owner set.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owners.contains(&user_id)
    }
}

impl NoteDraft {
    /// Creates an insert draft (no ID yet) for the given owner set.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        date: impl Into<String>,
        color: impl Into<String>,
        owners: Vec<UserId>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            date: date.into(),
            color: color.into(),
            owners,
        }
    }

    /// Checks draft-level invariants before persistence.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_owners(&self.owners)
    }
}
