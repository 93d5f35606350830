//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate directory and note-store calls into use-case level APIs:
//!   authentication, registration, and ownership-aware note mutation.
//! - Keep transport layers (HTTP handlers etc.) decoupled from storage
//!   details.
//!
//! # Invariants
//! - Services are stateless between calls; every mutation re-reads current
//!   state from the store before writing.
//! - Expected business conditions come back as tagged outcomes, never as
//!   errors; only infrastructure failures use the `Err` path.

pub mod auth_service;
pub mod note_service;
