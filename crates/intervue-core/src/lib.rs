//! Intervue core: the interview session lifecycle.
//!
//! This crate holds the pure domain layer: the candidate record and fixed
//! question schedule, the intake flow, the per-question countdown timer, the
//! session state machine, and the traits everything else plugs into
//! (persistence repositories and AI collaborators). It performs no I/O; the
//! surrounding crates drive it with events and execute the commands it
//! emits.

pub mod candidate;
pub mod collab;
pub mod engine;
pub mod error;
pub mod event;
pub mod intake;
pub mod repository;
pub mod schedule;
pub mod timer;

pub use candidate::{
    Candidate, InterviewAnswer, InterviewStatus, Question, QuestionDifficulty,
    compute_final_score,
};
pub use collab::{AnswerEvaluator, Evaluation, QuestionGenerator, ResumeParser, ResumeProfile, Summarizer};
pub use engine::{InterviewEngine, InterviewPhase};
pub use error::{InterviewError, Result};
pub use event::{EngineCommand, InterviewEvent, SubmitOrigin};
pub use intake::{IntakeData, IntakeField, IntakeFlow, IntakeStep, next_missing_field};
pub use repository::{ActiveSessionRepository, CandidateRepository, KeyValueStore};
pub use schedule::{QUESTION_SCHEDULE, QuestionSlot, TOTAL_QUESTIONS};
pub use timer::{CountdownTimer, TimerTick};
