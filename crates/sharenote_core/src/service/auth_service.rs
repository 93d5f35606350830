//! Authentication and registration use-case service.
//!
//! # Responsibility
//! - Authenticate login attempts against the user directory.
//! - Register new accounts with always-salted credentials.
//!
//! # Invariants
//! - Failed authentication has no side effects.
//! - Plaintext passwords never reach storage or logs.
//! - New credentials are always salted; the legacy plaintext path is
//!   verification-only.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::UserDirectory;
use crate::repo::{RepoError, RepoResult};
use crate::security::Credential;
use log::{info, warn};

/// Result of a login attempt.
///
/// The tags stay distinguishable for callers and tests; request handlers are
/// expected to surface only [`AuthOutcome::is_authorized`] so a failed login
/// does not confirm whether the account exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credential matched; carries the account ID for follow-up calls.
    Authorized(UserId),
    /// Account exists but the password did not match.
    InvalidCredentials,
    /// No account under this email.
    UnknownUser,
}

impl AuthOutcome {
    /// Collapsed anti-enumeration view of this outcome.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Account created; carries the stored record.
    Registered(User),
    /// The email is already registered.
    EmailTaken,
    /// The email is blank.
    InvalidEmail,
}

/// Authentication service over a user directory.
pub struct AuthService<D: UserDirectory> {
    directory: D,
}

impl<D: UserDirectory> AuthService<D> {
    /// Creates a service using the provided directory implementation.
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Checks an email/password pair against the directory.
    pub fn authenticate(&self, email: &str, password: &str) -> RepoResult<AuthOutcome> {
        let Some(user) = self.directory.find_by_email(email)? else {
            info!("event=auth module=service status=denied reason=unknown_user");
            return Ok(AuthOutcome::UnknownUser);
        };

        if !user.credential.verify(password) {
            info!(
                "event=auth module=service status=denied reason=bad_password user_id={}",
                user.id
            );
            return Ok(AuthOutcome::InvalidCredentials);
        }

        if user.credential.is_legacy() {
            // Accounts are never rewritten here, so this fires on every login
            // of a pre-salting account until an outer migration runs.
            warn!(
                "event=auth module=service status=ok user_id={} credential=legacy_plain",
                user.id
            );
        }

        Ok(AuthOutcome::Authorized(user.id))
    }

    /// Registers a new account, hashing the password into a salted credential.
    pub fn register(&mut self, email: &str, password: &str) -> RepoResult<RegisterOutcome> {
        if email.trim().is_empty() {
            return Ok(RegisterOutcome::InvalidEmail);
        }

        if self.directory.email_exists(email)? {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let user = User::new(email, Credential::from_password(password));
        match self.directory.insert_user(&user) {
            Ok(()) => {
                info!(
                    "event=register module=service status=ok user_id={}",
                    user.id
                );
                Ok(RegisterOutcome::Registered(user))
            }
            // Pre-check raced with a concurrent insert of the same email.
            Err(RepoError::EmailTaken(_)) => Ok(RegisterOutcome::EmailTaken),
            Err(err) => Err(err),
        }
    }

    /// Resolves the account ID behind a login email.
    pub fn user_id_for_email(&self, email: &str) -> RepoResult<Option<UserId>> {
        Ok(self.directory.find_by_email(email)?.map(|user| user.id))
    }

    /// Resolves the login email behind an account ID.
    pub fn email_for_user_id(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self.directory.find_by_id(id)?.map(|user| user.email))
    }
}
