//! Prompt builders for the Gemini collaborator calls.
//!
//! The interview targets a full stack (React/Node) developer role; every
//! prompt carries the resume text so questions and judgments stay grounded
//! in the candidate's actual background.

use intervue_core::candidate::{InterviewAnswer, QuestionDifficulty};
use intervue_core::schedule::NO_ANSWER_PLACEHOLDER;

/// Instruction sent alongside the uploaded resume file to get its raw text.
pub const EXTRACT_TEXT: &str = "Extract the text content from this resume.";

/// Prompt for pulling identity fields out of the extracted resume text.
pub fn identity_extraction(resume_text: &str) -> String {
    format!(
        "Extract the full name, email address, and phone number from the following resume text. \
         If a field is missing, return null for it.\n\n{resume_text}"
    )
}

/// Prompt for generating one question at the given difficulty.
pub fn question(resume_text: &str, difficulty: QuestionDifficulty) -> String {
    let difficulty = difficulty.to_string().to_lowercase();
    format!(
        "Based on the following resume for a full stack (React/Node) developer role, generate \
         one {difficulty} technical interview question. The question must be directly related \
         to the skills or experiences listed in the resume.\n\n\
         Resume:\n---\n{resume_text}\n---\n\n\
         Generate only the question text."
    )
}

/// Prompt for scoring a single answer.
pub fn evaluation(question_text: &str, answer_text: &str, resume_text: &str) -> String {
    let answer_text = if answer_text.is_empty() {
        NO_ANSWER_PLACEHOLDER
    } else {
        answer_text
    };
    format!(
        "You are an expert technical interviewer evaluating a candidate's answer for a full \
         stack (React/Node) role.\n\n\
         Candidate's Resume Context:\n---\n{resume_text}\n---\n\n\
         Interview Question:\n---\n{question_text}\n---\n\n\
         Candidate's Answer:\n---\n{answer_text}\n---\n\n\
         Based on the resume context, question, and answer, please provide:\n\
         1. A score for this specific answer on a scale of 0 to 10.\n\
         2. Brief, constructive feedback (2-3 sentences) on the answer's technical accuracy, \
         clarity, and depth. Explain the reasoning for your score."
    )
}

/// Prompt for the final performance summary over the whole transcript.
pub fn summary(resume_text: &str, answers: &[InterviewAnswer]) -> String {
    let transcript = answers
        .iter()
        .map(|a| {
            let answer_text = if a.answer_text.is_empty() {
                NO_ANSWER_PLACEHOLDER
            } else {
                a.answer_text.as_str()
            };
            format!(
                "Q: {}\nScore: {}/10\nFeedback: {}\nA: {}",
                a.question.text,
                a.score.unwrap_or(0),
                a.feedback.as_deref().unwrap_or(""),
                answer_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    format!(
        "You are an expert technical interviewer reviewing a candidate's performance for a full \
         stack (React/Node) role. Based on the candidate's resume and the entire interview \
         transcript (which includes per-question scores and feedback), provide a final, concise \
         summary of their performance.\n\n\
         The summary should highlight their overall strengths, weaknesses, and suitability for \
         the role, drawing conclusions from the patterns in their answers and scores. Do not \
         just repeat the individual feedback. Synthesize it into a final verdict.\n\n\
         Resume Context:\n---\n{resume_text}\n---\n\n\
         Interview Transcript with Scores & Feedback:\n---\n{transcript}\n---"
    )
}
