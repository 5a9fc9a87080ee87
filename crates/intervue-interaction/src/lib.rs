//! LLM-backed collaborators for the interview pipeline.
//!
//! Implements the core crate's `ResumeParser`, `QuestionGenerator`,
//! `AnswerEvaluator` and `Summarizer` traits against the Gemini API.

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;
