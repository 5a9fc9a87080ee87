//! Messages consumed and produced by the interview state machine.
//!
//! Timer ticks, user input and collaborator completions are all explicit
//! [`InterviewEvent`]s; the engine reacts by mutating the candidate record
//! and optionally emitting one [`EngineCommand`] for the shell to execute
//! asynchronously. This keeps every transition synchronous and
//! run-to-completion regardless of the frontend driving it.

use crate::candidate::QuestionDifficulty;
use crate::collab::Evaluation;
use crate::error::InterviewError;

/// How a submission was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOrigin {
    /// Explicit user submit (button or Enter).
    User,
    /// The countdown expired; a sentinel answer is recorded.
    Timeout,
}

/// Events the session state machine reacts to.
#[derive(Debug, Clone)]
pub enum InterviewEvent {
    /// One second elapsed.
    Tick,
    /// Suspend the countdown; legal only while an answer is awaited.
    Pause,
    /// Restart the countdown from the persisted remaining seconds.
    Resume,
    /// The candidate submitted (or timed out on) the current answer.
    Submit { text: String, origin: SubmitOrigin },
    /// The question generator finished for the given ordinal.
    QuestionReady {
        index: usize,
        outcome: Result<String, InterviewError>,
    },
    /// The answer evaluator finished for the given ordinal.
    EvaluationReady {
        index: usize,
        outcome: Result<Evaluation, InterviewError>,
    },
    /// The final summarizer finished.
    SummaryReady {
        outcome: Result<String, InterviewError>,
    },
}

/// Asynchronous work requested by the state machine.
///
/// Exactly one command may be outstanding at a time; its completion is fed
/// back as the matching [`InterviewEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Ask the generator for the question at `index`.
    GenerateQuestion {
        index: usize,
        difficulty: QuestionDifficulty,
    },
    /// Ask the evaluator to score the submitted answer at `index`.
    EvaluateAnswer {
        index: usize,
        question_text: String,
        answer_text: String,
    },
    /// Ask the summarizer for the final write-up.
    Summarize,
}
