//! Session field storage and resolution.
//!
//! This module provides:
//! - `SessionStore`: the persisted flat key-value store for user
//!   identity fields (one key per field, no cross-field transaction)
//! - `SessionContext`: the single injected object screens read identity
//!   from, resolving navigation-time overrides before stored values
//!
//! Logout clears every known key atomically from the caller's point of
//! view: after `clear_all`, a fresh read returns all fields absent.

pub mod context;
pub mod store;

pub use context::SessionContext;
pub use store::{SessionField, SessionFields, SessionStore};
