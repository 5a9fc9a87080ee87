//! Intervue infrastructure: persistence implementations.
//!
//! Persistence is a synchronous key-value store (one JSON document,
//! atomically rewritten) with two repositories on top: the roster of all
//! candidates and the active-session snapshot used for crash recovery.

pub mod active_session_repository;
pub mod json_store;
pub mod roster_repository;

pub use active_session_repository::{ACTIVE_SESSION_KEY, StoreActiveSessionRepository};
pub use json_store::{JsonFileStore, MemoryStore};
pub use roster_repository::{ROSTER_KEY, StoreCandidateRepository};
