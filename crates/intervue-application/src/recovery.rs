//! Startup recovery.
//!
//! On launch the roster is scanned exactly once for an in-progress
//! candidate. If one exists it becomes the active session and a recovery
//! prompt is surfaced; the user either resumes where they left off or
//! abandons, which finalizes the record with a zero score. The separately
//! persisted snapshot is preferred as the freshest copy of the record, and
//! a snapshot that no longer matches any in-progress roster entry is
//! cleared.

use intervue_core::candidate::Candidate;
use intervue_core::error::Result;
use intervue_core::repository::{ActiveSessionRepository, CandidateRepository};
use std::sync::Arc;

/// The user's answer to the recovery prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Continue the recovered session from its persisted state.
    Continue,
    /// Discard it and start fresh; the record is marked abandoned.
    StartNew,
}

/// One-shot startup check for an interrupted session.
pub struct RecoveryController {
    candidates: Arc<dyn CandidateRepository>,
    active_session: Arc<dyn ActiveSessionRepository>,
    checked: bool,
}

impl RecoveryController {
    pub fn new(
        candidates: Arc<dyn CandidateRepository>,
        active_session: Arc<dyn ActiveSessionRepository>,
    ) -> Self {
        Self {
            candidates,
            active_session,
            checked: false,
        }
    }

    /// Returns the in-progress session pending recovery, if any.
    ///
    /// Only the first call performs the scan; the prompt must not reappear
    /// later in the same process. When the snapshot holds the same candidate
    /// it wins over the roster copy, since the teardown flush wrote the most
    /// recent remaining time there.
    pub async fn pending_session(&mut self) -> Result<Option<Candidate>> {
        if self.checked {
            return Ok(None);
        }
        self.checked = true;

        let in_progress = self
            .candidates
            .list_all()
            .await?
            .into_iter()
            .find(|c| c.is_in_progress());
        let snapshot = self.active_session.load().await?;

        let Some(candidate) = in_progress else {
            if snapshot.is_some() {
                tracing::debug!("clearing stale session snapshot");
                self.active_session.clear().await?;
            }
            return Ok(None);
        };

        let recovered = match snapshot {
            Some(snap) if snap.id == candidate.id && snap.is_in_progress() => snap,
            _ => {
                // Snapshot lost or stale; re-point it at the roster copy.
                self.active_session.store(&candidate).await?;
                candidate
            }
        };
        tracing::info!(
            candidate = %recovered.id,
            index = recovered.current_question_index,
            time_left = recovered.time_left_on_question,
            "unfinished session found"
        );
        Ok(Some(recovered))
    }
}
