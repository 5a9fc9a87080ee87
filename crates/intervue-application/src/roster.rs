//! Roster queries for the interviewer view.
//!
//! Search and sort are pure functions over the candidate list; the roster
//! itself is read straight from the repository. Sorting keeps candidates
//! without a final score (unfinished interviews) at the bottom regardless of
//! direction.

use intervue_core::candidate::Candidate;

/// Column to sort the roster by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SortKey {
    Name,
    Status,
    /// Questions answered so far
    Progress,
    #[strum(serialize = "Final Score")]
    FinalScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Search and sort settings for one roster render.
#[derive(Debug, Clone)]
pub struct RosterQuery {
    /// Case-insensitive substring over name and email; empty matches all.
    pub search: String,
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for RosterQuery {
    /// Best performers first.
    fn default() -> Self {
        Self {
            search: String::new(),
            key: SortKey::FinalScore,
            direction: SortDirection::Descending,
        }
    }
}

impl RosterQuery {
    /// Filters and sorts a snapshot of the roster.
    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<Candidate> = candidates
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match self.key {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortKey::Status => a.status.cmp(&b.status),
                SortKey::Progress => a.current_question_index.cmp(&b.current_question_index),
                // Missing scores compare below every real score.
                SortKey::FinalScore => score_rank(a).cmp(&score_rank(b)),
            };
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        // Unscored candidates stay at the bottom in either direction.
        if self.key == SortKey::FinalScore {
            rows.sort_by_key(|c| c.final_score.is_none());
        }
        rows
    }
}

fn score_rank(candidate: &Candidate) -> i16 {
    candidate.final_score.map_or(-1, i16::from)
}
