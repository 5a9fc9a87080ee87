//! Roster persistence over the key-value store.

use async_trait::async_trait;
use intervue_core::candidate::Candidate;
use intervue_core::error::Result;
use intervue_core::repository::{CandidateRepository, KeyValueStore};
use std::sync::Arc;

/// Storage key for the full roster.
pub const ROSTER_KEY: &str = "candidates";

/// [`CandidateRepository`] backed by a [`KeyValueStore`].
///
/// The roster lives under a single key as a JSON array; every save is a
/// read-modify-write of the whole collection, which keeps the single-writer
/// discipline trivial (last write wins at the store).
pub struct StoreCandidateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl StoreCandidateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_roster(&self) -> Result<Vec<Candidate>> {
        match self.store.get(ROSTER_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_roster(&self, roster: &[Candidate]) -> Result<()> {
        let raw = serde_json::to_string(roster)?;
        self.store.set(ROSTER_KEY, &raw)
    }
}

#[async_trait]
impl CandidateRepository for StoreCandidateRepository {
    async fn list_all(&self) -> Result<Vec<Candidate>> {
        self.read_roster()
    }

    async fn find_by_id(&self, candidate_id: &str) -> Result<Option<Candidate>> {
        Ok(self
            .read_roster()?
            .into_iter()
            .find(|c| c.id == candidate_id))
    }

    async fn save(&self, candidate: &Candidate) -> Result<()> {
        let mut roster = self.read_roster()?;
        match roster.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => *existing = candidate.clone(),
            None => roster.push(candidate.clone()),
        }
        tracing::debug!(candidate = %candidate.id, total = roster.len(), "roster saved");
        self.write_roster(&roster)
    }
}
