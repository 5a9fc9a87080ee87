//! External collaborator contracts.
//!
//! Resume parsing, question generation, answer evaluation and final
//! summarization are all delegated to external text-generation services.
//! These traits are the core's only view of them; implementations live in
//! `intervue-interaction`. The fallback policy for failed calls belongs to
//! the state machine, not to implementations.

use crate::candidate::{InterviewAnswer, QuestionDifficulty};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity fields and text extracted from an uploaded resume.
///
/// `resume_text` is mandatory: without it no question can be grounded in the
/// candidate's background and intake cannot proceed. The identity fields are
/// best-effort; whatever is missing is collected by the intake flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_text: String,
}

/// Score and feedback for a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0..=10
    pub score: u8,
    pub feedback: String,
}

/// Extracts text and identity fields from an uploaded resume file.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    /// Parses the raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InterviewError::ParseFailure`](crate::InterviewError) when
    /// the file is unreadable or yields no resume text; the caller surfaces
    /// this to the user with a re-upload affordance.
    async fn parse(&self, file_bytes: &[u8], mime_type: &str) -> Result<ResumeProfile>;
}

/// Generates one interview question grounded in the candidate's resume.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, resume_text: &str, difficulty: QuestionDifficulty)
    -> Result<String>;
}

/// Scores a submitted answer against its question and the resume context.
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        question_text: &str,
        answer_text: &str,
        resume_text: &str,
    ) -> Result<Evaluation>;
}

/// Writes the final performance summary over the full answer history.
///
/// Only the summary text is used; the final numeric score is always computed
/// locally by the engine.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, resume_text: &str, answers: &[InterviewAnswer]) -> Result<String>;
}
