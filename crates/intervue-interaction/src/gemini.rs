//! Gemini REST client implementing the four collaborator contracts.
//!
//! Talks to the `generateContent` endpoint directly. Structured calls
//! (identity extraction, answer evaluation, summarization) use JSON response
//! mode with a response schema; resume files go up as base64 inline data.
//!
//! Every failure maps to the typed core error for its call site; the
//! fallback policy (generic question, zero score, fixed summary) lives in
//! the engine, not here.

use crate::prompts;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use intervue_core::candidate::{InterviewAnswer, QuestionDifficulty};
use intervue_core::collab::{
    AnswerEvaluator, Evaluation, QuestionGenerator, ResumeParser, ResumeProfile, Summarizer,
};
use intervue_core::error::{InterviewError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default per-request timeout. A hung collaborator call surfaces as a
/// failure and the engine's fallback keeps the interview moving.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini HTTP API, shared by all four collaborator roles.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and the default model
    /// and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit per-request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    /// Loads the API key from the `GEMINI_API_KEY` environment variable.
    pub fn try_from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            InterviewError::internal("GEMINI_API_KEY environment variable is not set")
        })?;
        Ok(Self::new(api_key))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={api_key}",
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| InterviewError::internal(format!("Gemini request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_string());
            tracing::warn!(%status, "Gemini call rejected");
            return Err(InterviewError::internal(format!(
                "Gemini returned {status}: {body_text}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            InterviewError::internal(format!("failed to parse Gemini response: {err}"))
        })?;
        extract_text_response(parsed)
    }

    async fn generate_text(&self, parts: Vec<Part>) -> Result<String> {
        self.send_request(&GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: None,
        })
        .await
    }

    /// Sends a prompt in JSON response mode and deserializes the reply.
    async fn generate_json<T: serde::de::DeserializeOwned>(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<T> {
        let text = self
            .send_request(&GenerateContentRequest {
                contents: vec![Content {
                    parts: vec![Part::Text { text: prompt }],
                }],
                generation_config: Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: Some(schema),
                }),
            })
            .await?;
        serde_json::from_str(&text).map_err(|err| {
            InterviewError::internal(format!("Gemini returned malformed JSON: {err}"))
        })
    }
}

#[async_trait]
impl ResumeParser for GeminiClient {
    async fn parse(&self, file_bytes: &[u8], mime_type: &str) -> Result<ResumeProfile> {
        let inline = Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.to_string(),
                data: BASE64_STANDARD.encode(file_bytes),
            },
        };
        let resume_text = self
            .generate_text(vec![
                inline,
                Part::Text {
                    text: prompts::EXTRACT_TEXT.to_string(),
                },
            ])
            .await
            .map_err(|err| InterviewError::parse_failure(err.to_string()))?;

        if resume_text.trim().is_empty() {
            return Err(InterviewError::parse_failure(
                "Failed to parse resume. Please ensure it is a valid PDF or DOCX file.",
            ));
        }

        let extracted: ExtractedIdentity = self
            .generate_json(
                prompts::identity_extraction(&resume_text),
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Candidate's full name" },
                        "email": { "type": "STRING", "description": "Candidate's email address" },
                        "phone": { "type": "STRING", "description": "Candidate's phone number" }
                    }
                }),
            )
            .await
            .map_err(|err| InterviewError::parse_failure(err.to_string()))?;

        Ok(ResumeProfile {
            name: extracted.name,
            email: extracted.email,
            phone: extracted.phone,
            resume_text,
        })
    }
}

#[async_trait]
impl QuestionGenerator for GeminiClient {
    async fn generate(
        &self,
        resume_text: &str,
        difficulty: QuestionDifficulty,
    ) -> Result<String> {
        let text = self
            .generate_text(vec![Part::Text {
                text: prompts::question(resume_text, difficulty),
            }])
            .await
            .map_err(|err| InterviewError::GenerationFailure(err.to_string()))?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl AnswerEvaluator for GeminiClient {
    async fn evaluate(
        &self,
        question_text: &str,
        answer_text: &str,
        resume_text: &str,
    ) -> Result<Evaluation> {
        let payload: EvaluationPayload = self
            .generate_json(
                prompts::evaluation(question_text, answer_text, resume_text),
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "score": { "type": "INTEGER", "description": "Score for the answer (0-10)" },
                        "feedback": { "type": "STRING", "description": "Constructive feedback on the answer." }
                    },
                    "required": ["score", "feedback"]
                }),
            )
            .await
            .map_err(|err| InterviewError::EvaluationFailure(err.to_string()))?;
        Ok(payload.into_evaluation())
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, resume_text: &str, answers: &[InterviewAnswer]) -> Result<String> {
        let payload: SummaryPayload = self
            .generate_json(
                prompts::summary(resume_text, answers),
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING", "description": "Detailed summary and feedback on strengths and weaknesses." }
                    },
                    "required": ["summary"]
                }),
            )
            .await
            .map_err(|err| InterviewError::SummarizationFailure(err.to_string()))?;
        Ok(payload.summary)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ExtractedIdentity {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize)]
struct EvaluationPayload {
    score: i64,
    feedback: String,
}

impl EvaluationPayload {
    /// Clamps the model's score into the 0..=10 contract.
    fn into_evaluation(self) -> Evaluation {
        Evaluation {
            score: self.score.clamp(0, 10) as u8,
            feedback: self.feedback,
        }
    }
}

#[derive(Deserialize)]
struct SummaryPayload {
    summary: String,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(InterviewError::internal(
            "Gemini response contained no text parts",
        ))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_wire_names() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "application/pdf".to_string(),
                            data: "QUJD".to_string(),
                        },
                    },
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: None,
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "application/pdf"
        );
        assert_eq!(value["contents"][0]["parts"][1]["text"], "prompt");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn extracts_concatenated_text_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "Hello world");
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text_response(response).is_err());
    }

    #[test]
    fn evaluation_scores_are_clamped_into_contract() {
        let payload = EvaluationPayload {
            score: 14,
            feedback: "great".to_string(),
        };
        assert_eq!(payload.into_evaluation().score, 10);

        let payload = EvaluationPayload {
            score: -3,
            feedback: "bad".to_string(),
        };
        assert_eq!(payload.into_evaluation().score, 0);
    }
}
