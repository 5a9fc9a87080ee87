//! Candidate intake flow.
//!
//! After a resume is parsed, the identity fields it did not yield are
//! collected one at a time before a [`Candidate`] may be created. The flow
//! always starts at the *first missing* field, skipping anything already
//! extracted from the resume.

use crate::candidate::{Candidate, InterviewStatus};
use crate::collab::ResumeProfile;
use crate::error::{InterviewError, Result};
use serde::{Deserialize, Serialize};

/// An identity field collected during intake, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum IntakeField {
    Name,
    Email,
    Phone,
}

/// Partial identity record accumulated during intake.
///
/// Fields hold trimmed, non-empty values or nothing; whitespace-only input
/// never lands here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_text: String,
}

/// Returns the first of name, email, phone that is still missing.
pub fn next_missing_field(data: &IntakeData) -> Option<IntakeField> {
    if data.name.is_none() {
        Some(IntakeField::Name)
    } else if data.email.is_none() {
        Some(IntakeField::Email)
    } else if data.phone.is_none() {
        Some(IntakeField::Phone)
    } else {
        None
    }
}

/// Result of one intake submission.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeStep {
    /// Another field is still missing; prompt for it.
    Prompt(IntakeField),
    /// All fields known; a fresh in-progress candidate has been created.
    Complete(Candidate),
}

/// Sequential collection of missing identity fields.
#[derive(Debug, Clone)]
pub struct IntakeFlow {
    data: IntakeData,
    current: Option<IntakeField>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl IntakeFlow {
    /// Starts an intake flow from a parsed resume profile.
    ///
    /// # Errors
    ///
    /// Returns a `ParseFailure` when the profile carries no resume text;
    /// the interview cannot be grounded without it.
    pub fn new(profile: ResumeProfile) -> Result<Self> {
        if profile.resume_text.trim().is_empty() {
            return Err(InterviewError::parse_failure(
                "Could not read resume content.",
            ));
        }
        let data = IntakeData {
            name: normalize(profile.name),
            email: normalize(profile.email),
            phone: normalize(profile.phone),
            resume_text: profile.resume_text,
        };
        let current = next_missing_field(&data);
        Ok(Self { data, current })
    }

    /// The field currently being prompted for, or `None` when every field
    /// was already known at construction.
    pub fn current_field(&self) -> Option<IntakeField> {
        self.current
    }

    /// True when no field is missing and [`IntakeFlow::complete`] may be
    /// called directly (everything came from the resume).
    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    /// Accepts one user-submitted value for the current field.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for empty/whitespace-only input or when
    /// the flow is already complete; the flow state is unchanged in both
    /// cases and callers reject the input silently.
    pub fn submit(&mut self, value: &str) -> Result<IntakeStep> {
        let field = self
            .current
            .ok_or_else(|| InterviewError::validation("intake is already complete"))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(InterviewError::validation(format!(
                "empty value submitted for {field}"
            )));
        }

        match field {
            IntakeField::Name => self.data.name = Some(value.to_string()),
            IntakeField::Email => self.data.email = Some(value.to_string()),
            IntakeField::Phone => self.data.phone = Some(value.to_string()),
        }
        self.current = next_missing_field(&self.data);

        match self.current {
            Some(next) => Ok(IntakeStep::Prompt(next)),
            None => Ok(IntakeStep::Complete(self.complete())),
        }
    }

    /// Builds the fresh in-progress candidate once every field is known.
    pub fn complete(&self) -> Candidate {
        let now = chrono::Utc::now().to_rfc3339();
        Candidate {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.data.name.clone().unwrap_or_default(),
            email: self.data.email.clone().unwrap_or_default(),
            phone: self.data.phone.clone().unwrap_or_default(),
            resume_text: self.data.resume_text.clone(),
            status: InterviewStatus::InProgress,
            answers: Vec::new(),
            current_question_index: 0,
            final_score: None,
            summary: None,
            time_left_on_question: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
