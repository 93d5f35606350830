//! Ownership-aware note use-case service.
//!
//! # Responsibility
//! - Provide save/detach/add-owner/query entry points over the note store.
//! - Keep a plain save from touching ownership: the owner set changes only
//!   through the dedicated operations.
//!
//! # Invariants
//! - Every mutation re-reads current state from the store first; nothing is
//!   cached across calls.
//! - A note whose last owner is removed is deleted, never left ownerless.
//! - Mutations are unconditional replace-by-id: concurrent owner changes on
//!   the same note resolve last-writer-wins at the store.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserDirectory;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
///
/// Business conditions (not an owner, note missing, already an owner) are
/// outcome tags, not errors; this type covers infrastructure failures only.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of removing a caller from a note's owner set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachOutcome {
    /// The caller was the sole owner; the whole note is gone.
    NoteDeleted,
    /// The caller was removed; carries the note as persisted afterwards.
    OwnerRemoved(Note),
    /// The note does not exist or the caller is not an owner. One tag for
    /// both, so a non-owner cannot probe for note existence.
    NotAuthorized,
}

/// Result of granting a user access to a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOwnerOutcome {
    /// Owner appended; carries the note as persisted afterwards.
    Added(Note),
    /// Benign no-op: the user already had access. Carries the untouched note.
    AlreadyOwner(Note),
    /// No such user in the directory.
    UserNotFound,
    /// No such note.
    NoteNotFound,
}

/// Ownership controller over a note store and a user directory.
pub struct NoteService<R: NoteRepository, D: UserDirectory> {
    repo: R,
    directory: D,
}

impl<R: NoteRepository, D: UserDirectory> NoteService<R, D> {
    /// Creates a service using the provided store implementations.
    pub fn new(repo: R, directory: D) -> Self {
        Self { repo, directory }
    }

    /// Saves a note, preserving stored ownership on updates.
    ///
    /// - No ID: insert with a generated ID; the draft's owner set is honored.
    /// - Known ID: replace the descriptive fields only. The stored owner set
    ///   is carried over; a save payload can never strip other owners.
    /// - Unknown ID: insert with the supplied ID.
    ///
    /// Returns the note as persisted (generated ID, store timestamps).
    pub fn save_note(&mut self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        match draft.id {
            Some(id) => match self.repo.get_note(id)? {
                Some(stored) => {
                    let note = Note {
                        id,
                        title: draft.title.clone(),
                        content: draft.content.clone(),
                        date: draft.date.clone(),
                        color: draft.color.clone(),
                        owners: stored.owners,
                        created_at: stored.created_at,
                        updated_at: stored.updated_at,
                    };
                    self.repo.replace_note(&note)?;
                    self.read_back(id, "updated note not found in read-back")
                }
                None => self.insert_draft(draft),
            },
            None => self.insert_draft(draft),
        }
    }

    /// Removes `user_id` from a note's owner set, deleting the note when it
    /// was the sole owner.
    ///
    /// The removal works on the owner set fetched here, not a cached copy.
    pub fn delete_owner_from_note(
        &mut self,
        user_id: UserId,
        note_id: NoteId,
    ) -> Result<DetachOutcome, NoteServiceError> {
        let Some(note) = self.repo.get_note_for_owner(note_id, user_id)? else {
            info!(
                "event=note_detach module=service status=denied note_id={note_id} user_id={user_id}"
            );
            return Ok(DetachOutcome::NotAuthorized);
        };

        if note.owners.len() == 1 {
            self.repo.delete_note(note_id)?;
            info!(
                "event=note_detach module=service status=ok note_id={note_id} user_id={user_id} result=deleted"
            );
            return Ok(DetachOutcome::NoteDeleted);
        }

        let mut updated = note;
        updated.owners.retain(|owner| *owner != user_id);
        self.repo.replace_note(&updated)?;
        info!(
            "event=note_detach module=service status=ok note_id={note_id} user_id={user_id} result=owner_removed"
        );
        let note = self.read_back(note_id, "detached note not found in read-back")?;
        Ok(DetachOutcome::OwnerRemoved(note))
    }

    /// Grants `user_id` access to a note.
    ///
    /// Adding a user who already has access is a benign no-op, reported with
    /// its own tag rather than an error.
    pub fn add_owner_to_note(
        &mut self,
        user_id: UserId,
        note_id: NoteId,
    ) -> Result<AddOwnerOutcome, NoteServiceError> {
        if self.directory.find_by_id(user_id)?.is_none() {
            info!(
                "event=note_share module=service status=denied note_id={note_id} user_id={user_id} reason=unknown_user"
            );
            return Ok(AddOwnerOutcome::UserNotFound);
        }

        let Some(note) = self.repo.get_note(note_id)? else {
            info!(
                "event=note_share module=service status=denied note_id={note_id} user_id={user_id} reason=unknown_note"
            );
            return Ok(AddOwnerOutcome::NoteNotFound);
        };

        if note.is_owned_by(user_id) {
            return Ok(AddOwnerOutcome::AlreadyOwner(note));
        }

        let mut updated = note;
        updated.owners.push(user_id);
        self.repo.replace_note(&updated)?;
        info!("event=note_share module=service status=ok note_id={note_id} user_id={user_id}");
        let note = self.read_back(note_id, "shared note not found in read-back")?;
        Ok(AddOwnerOutcome::Added(note))
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, note_id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(note_id)?)
    }

    /// Returns whether the note exists and `user_id` is in its owner set.
    pub fn is_owner(&self, user_id: UserId, note_id: NoteId) -> Result<bool, NoteServiceError> {
        let note = self.repo.get_note(note_id)?;
        Ok(note.is_some_and(|note| note.is_owned_by(user_id)))
    }

    /// Lists all notes owned by the account behind `email`.
    ///
    /// An unknown email owns nothing and yields an empty list.
    pub fn notes_for_user(&self, email: &str) -> Result<Vec<Note>, NoteServiceError> {
        match self.directory.find_by_email(email)? {
            Some(user) => Ok(self.repo.list_notes_for_owner(user.id)?),
            None => Ok(Vec::new()),
        }
    }

    fn insert_draft(&mut self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        let id = self.repo.insert_note(draft)?;
        info!("event=note_save module=service status=ok note_id={id} mode=insert");
        self.read_back(id, "created note not found in read-back")
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(details))
    }
}
