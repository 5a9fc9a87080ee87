//! Application layer: use case orchestration over the core domain.
//!
//! Wires the state machine, the persistence repositories and the
//! collaborator traits together, and owns the startup recovery check and
//! the interviewer roster queries.

pub mod interview_usecase;
pub mod recovery;
pub mod roster;

pub use interview_usecase::{IntakeOutcome, InterviewUseCase};
pub use recovery::{RecoveryController, RecoveryDecision};
pub use roster::{RosterQuery, SortDirection, SortKey};
