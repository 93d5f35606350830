//! Password credential handling.
//!
//! # Responsibility
//! - Turn plaintext passwords into storable salted-hash credentials.
//! - Verify login attempts against stored credentials.
//!
//! # Invariants
//! - Plaintext passwords are never persisted and never logged.
//! - New credentials are always salted; the plaintext-equality path exists
//!   only to verify pre-existing legacy records.

pub mod credential;

pub use credential::Credential;
