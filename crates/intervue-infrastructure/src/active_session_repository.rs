//! Active-session snapshot persistence.

use async_trait::async_trait;
use intervue_core::candidate::Candidate;
use intervue_core::error::Result;
use intervue_core::repository::{ActiveSessionRepository, KeyValueStore};
use std::sync::Arc;

/// Storage key for the snapshot of the session currently being driven.
pub const ACTIVE_SESSION_KEY: &str = "currentInterview";

/// [`ActiveSessionRepository`] backed by a [`KeyValueStore`].
///
/// The snapshot is the whole candidate record serialized under one key;
/// `clear` writes an explicit JSON `null` so a cleared pointer is
/// distinguishable from a never-written one only by absence.
pub struct StoreActiveSessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl StoreActiveSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActiveSessionRepository for StoreActiveSessionRepository {
    async fn load(&self) -> Result<Option<Candidate>> {
        match self.store.get(ACTIVE_SESSION_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(None),
        }
    }

    async fn store(&self, candidate: &Candidate) -> Result<()> {
        let raw = serde_json::to_string(candidate)?;
        self.store.set(ACTIVE_SESSION_KEY, &raw)
    }

    async fn clear(&self) -> Result<()> {
        self.store.set(ACTIVE_SESSION_KEY, "null")
    }
}
