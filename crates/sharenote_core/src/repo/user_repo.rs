//! User directory contract and SQLite implementation.
//!
//! # Responsibility
//! - Map emails and user IDs to account records.
//! - Enforce email uniqueness at insert time.
//!
//! # Invariants
//! - At most one user per email; duplicate inserts fail with `EmailTaken`.
//! - Users are never updated or deleted through this contract.

use crate::model::user::{User, UserId};
use crate::repo::{RepoError, RepoResult};
use crate::security::Credential;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT id, email, credential FROM users";

/// Directory interface the authentication path relies on.
pub trait UserDirectory {
    /// Looks up an account by its login email (case-sensitive).
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Looks up an account by its stable ID.
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns whether an account with this email exists.
    fn email_exists(&self, email: &str) -> RepoResult<bool>;
    /// Inserts a new account. Fails with `EmailTaken` on a duplicate email.
    fn insert_user(&mut self, user: &User) -> RepoResult<()>;
}

/// SQLite-backed user directory.
pub struct SqliteUserDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserDirectory<'conn> {
    /// Constructs a directory from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserDirectory for SqliteUserDirectory<'_> {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let result = self.conn.execute(
            "INSERT INTO users (id, email, credential) VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.credential.as_stored_string(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_constraint_violation(&err) => {
                Err(RepoError::EmailTaken(user.email.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in users.id"))
    })?;

    let credential_text: String = row.get("credential")?;
    if credential_text.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty credential for user {id}"
        )));
    }

    Ok(User {
        id,
        email: row.get("email")?,
        credential: Credential::parse(&credential_text),
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
