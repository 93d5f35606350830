//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the collaborator contracts the core consumes: the user directory
//!   and the note store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `EmailTaken`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::note::NoteValidationError;
use crate::model::user::UserValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod note_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for directory and note-store operations.
#[derive(Debug)]
pub enum RepoError {
    UserValidation(UserValidationError),
    NoteValidation(NoteValidationError),
    Db(DbError),
    /// Insert rejected because the email is already registered.
    EmailTaken(String),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserValidation(err) => write!(f, "{err}"),
            Self::NoteValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::EmailTaken(email) => write!(f, "email already registered: {email}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UserValidation(err) => Some(err),
            Self::NoteValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::EmailTaken(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::UserValidation(value)
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::NoteValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
