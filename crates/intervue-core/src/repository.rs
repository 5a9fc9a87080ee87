//! Persistence traits.
//!
//! Storage is abstract: a synchronous string key-value store with
//! last-write-wins semantics, and two repositories layered over it - the
//! roster of all candidates and the active-session snapshot kept separately
//! for crash recovery. Implementations live in `intervue-infrastructure`.

use crate::candidate::Candidate;
use crate::error::Result;
use async_trait::async_trait;

/// A synchronous key-value store with get/set semantics.
///
/// Writes are whole-value and last-write-wins; there are no partial updates.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores the value under the key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Repository over the roster of all candidates.
///
/// The roster is shared mutable state under single-writer discipline: every
/// save is a read-modify-write of the whole collection.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Lists every candidate ever created.
    async fn list_all(&self) -> Result<Vec<Candidate>>;

    /// Finds a candidate by its ID.
    async fn find_by_id(&self, candidate_id: &str) -> Result<Option<Candidate>>;

    /// Upserts one candidate into the roster.
    async fn save(&self, candidate: &Candidate) -> Result<()>;
}

/// Repository over the active-session snapshot.
///
/// The snapshot duplicates the in-progress candidate so a reload lands in
/// the recovery path with accurate state even if the roster write raced the
/// crash.
#[async_trait]
pub trait ActiveSessionRepository: Send + Sync {
    /// Loads the snapshot of the session being driven, if any.
    async fn load(&self) -> Result<Option<Candidate>>;

    /// Replaces the snapshot.
    async fn store(&self, candidate: &Candidate) -> Result<()>;

    /// Clears the active-session pointer.
    async fn clear(&self) -> Result<()>;
}
