//! The fixed interview schedule and sentinel strings.
//!
//! Every interview asks the same ordered sequence of six questions: two easy
//! at 60 seconds, two medium at 180, two hard at 300. Only the question text
//! varies per candidate.

use crate::candidate::QuestionDifficulty;

/// One slot in the fixed schedule: difficulty plus answer time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSlot {
    pub difficulty: QuestionDifficulty,
    /// Seconds allowed for the answer
    pub time_limit: u32,
}

/// The ordered schedule, indexed by question ordinal.
pub const QUESTION_SCHEDULE: [QuestionSlot; 6] = [
    QuestionSlot {
        difficulty: QuestionDifficulty::Easy,
        time_limit: 60,
    },
    QuestionSlot {
        difficulty: QuestionDifficulty::Easy,
        time_limit: 60,
    },
    QuestionSlot {
        difficulty: QuestionDifficulty::Medium,
        time_limit: 180,
    },
    QuestionSlot {
        difficulty: QuestionDifficulty::Medium,
        time_limit: 180,
    },
    QuestionSlot {
        difficulty: QuestionDifficulty::Hard,
        time_limit: 300,
    },
    QuestionSlot {
        difficulty: QuestionDifficulty::Hard,
        time_limit: 300,
    },
];

/// Total number of questions in every interview.
pub const TOTAL_QUESTIONS: usize = QUESTION_SCHEDULE.len();

/// Recorded as the answer text when the countdown expires with no submission.
pub const TIMEOUT_ANSWER: &str = "(Time ran out)";

/// Substituted into evaluator/summarizer prompts for an empty answer.
pub const NO_ANSWER_PLACEHOLDER: &str = "(No answer provided.)";

/// Asked instead when the question generator fails, so the interview can
/// always progress.
pub const FALLBACK_QUESTION: &str =
    "Can you describe a challenging project you worked on using React and Node.js?";

/// Feedback written when the evaluator fails (score falls back to 0).
pub const EVALUATION_FALLBACK_FEEDBACK: &str =
    "Could not evaluate the answer due to an error.";

/// Summary written when the summarizer fails.
pub const SUMMARY_FALLBACK: &str = "Could not generate a final summary due to an error.";

/// Summary written when a recovered session is abandoned.
pub const ABANDONED_SUMMARY: &str = "Interview abandoned.";
