//! Candidate domain model.
//!
//! A [`Candidate`] is one person's end-to-end interview record: identity
//! fields gathered at intake, the ordered answer history, progression state,
//! and the final result. This is the "pure" model the state machine operates
//! on, independent of any storage format.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a generated interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
}

/// A single generated interview question. Immutable once generated; the
/// difficulty and time limit come from the fixed schedule at the question's
/// ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question ordinal (0-based index into the schedule)
    pub id: usize,
    /// The generated question text
    pub text: String,
    pub difficulty: QuestionDifficulty,
    /// Time allowed for the answer, in seconds
    pub time_limit: u32,
}

/// One question/answer pair in a candidate's history.
///
/// Created with an empty `answer_text` when the question is generated.
/// `answer_text` is written exactly once by submission; `feedback` and
/// `score` are written exactly once by evaluation, strictly after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub question: Question,
    pub answer_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Per-answer score, 0..=10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl InterviewAnswer {
    /// Creates an empty answer slot for a freshly generated question.
    pub fn new(question: Question) -> Self {
        Self {
            question,
            answer_text: String::new(),
            feedback: None,
            score: None,
        }
    }

    /// True once the evaluator has written a score for this answer.
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }
}

/// Lifecycle status of a candidate's interview.
///
/// Transitions only ever move forward: NotStarted -> InProgress -> Completed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
pub enum InterviewStatus {
    #[serde(rename = "NOT_STARTED")]
    #[strum(serialize = "Not Started")]
    NotStarted,
    #[serde(rename = "IN_PROGRESS")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    #[strum(serialize = "Completed")]
    Completed,
}

/// One candidate's interview record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier (UUID format)
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Full text extracted from the uploaded resume
    pub resume_text: String,
    pub status: InterviewStatus,
    /// Ordered answer history; index equals question ordinal
    #[serde(default)]
    pub answers: Vec<InterviewAnswer>,
    /// Ordinal of the question currently being asked or prepared
    pub current_question_index: usize,
    /// Final percentage score, 0..=100; set iff status is Completed
    pub final_score: Option<u8>,
    /// AI-written performance summary; set iff status is Completed
    pub summary: Option<String>,
    /// Remaining seconds on the current question; non-null only while an
    /// answer is awaited, so a reload can recover the countdown
    pub time_left_on_question: Option<u32>,
    /// Timestamp when the record was created (RFC 3339)
    #[serde(default)]
    pub created_at: String,
    /// Timestamp of the last mutation (RFC 3339)
    #[serde(default)]
    pub updated_at: String,
}

impl Candidate {
    pub fn is_in_progress(&self) -> bool {
        self.status == InterviewStatus::InProgress
    }

    /// Bumps the updated-at stamp. Called after every mutation.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Marks a recovered session as abandoned: completed with a zero score
    /// and a sentinel summary, without consulting any collaborator.
    pub fn abandon(&mut self) {
        self.status = InterviewStatus::Completed;
        self.final_score = Some(0);
        self.summary = Some(crate::schedule::ABANDONED_SUMMARY.to_string());
        self.time_left_on_question = None;
        self.touch();
    }
}

/// Computes the final percentage score over an answer history.
///
/// `round(100 * sum(score_i) / (10 * count))`, with unevaluated answers
/// counting as zero. This is always computed locally; the summarizer's own
/// number is never trusted.
pub fn compute_final_score(answers: &[InterviewAnswer]) -> u8 {
    let total_possible = answers.len() as u32 * 10;
    if total_possible == 0 {
        return 0;
    }
    let total: u32 = answers
        .iter()
        .map(|a| u32::from(a.score.unwrap_or(0)))
        .sum();
    (f64::from(total * 100) / f64::from(total_possible)).round() as u8
}
