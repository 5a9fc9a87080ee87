//! Interview use case implementation.
//!
//! `InterviewUseCase` is the single writer for interview state. It owns the
//! [`InterviewEngine`] for the active session, executes the commands the
//! engine emits against the collaborator traits, and persists the candidate
//! after every transition so a crash at any point recovers cleanly.
//!
//! Collaborator failures are captured into the completion event and handed
//! back to the engine, which substitutes the fixed fallback value. The only
//! errors this layer propagates are persistence failures and rejected inputs.

use intervue_core::candidate::Candidate;
use intervue_core::collab::{AnswerEvaluator, QuestionGenerator, ResumeParser, Summarizer};
use intervue_core::engine::{InterviewEngine, InterviewPhase};
use intervue_core::error::{InterviewError, Result};
use intervue_core::event::{EngineCommand, InterviewEvent, SubmitOrigin};
use intervue_core::intake::{IntakeField, IntakeFlow, IntakeStep};
use intervue_core::repository::{ActiveSessionRepository, CandidateRepository};
use std::sync::Arc;

/// What the frontend should do next after an intake-related call.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    /// Prompt the user for the named field.
    Prompt(IntakeField),
    /// Intake is done and the interview has started.
    Started,
}

/// Orchestrates one interview session end to end.
///
/// # Responsibilities
///
/// - Resume upload and the intake chat that fills missing identity fields
/// - Driving the engine: executing its commands and feeding back completions
/// - Persisting the roster and the active-session snapshot on every change
/// - Recovery: resuming or abandoning a session found at startup
///
/// Exactly one instance exists per process and all methods take `&mut self`,
/// so no two writers can ever race on the stored state.
pub struct InterviewUseCase {
    /// Repository for the roster of all candidates
    candidates: Arc<dyn CandidateRepository>,
    /// Repository for the active-session snapshot
    active_session: Arc<dyn ActiveSessionRepository>,
    resume_parser: Arc<dyn ResumeParser>,
    question_generator: Arc<dyn QuestionGenerator>,
    evaluator: Arc<dyn AnswerEvaluator>,
    summarizer: Arc<dyn Summarizer>,
    /// Engine for the session being driven; kept after completion so the
    /// final result remains readable until the next upload.
    engine: Option<InterviewEngine>,
    /// Intake flow in progress, before a candidate exists.
    intake: Option<IntakeFlow>,
}

impl InterviewUseCase {
    pub fn new(
        candidates: Arc<dyn CandidateRepository>,
        active_session: Arc<dyn ActiveSessionRepository>,
        resume_parser: Arc<dyn ResumeParser>,
        question_generator: Arc<dyn QuestionGenerator>,
        evaluator: Arc<dyn AnswerEvaluator>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            candidates,
            active_session,
            resume_parser,
            question_generator,
            evaluator,
            summarizer,
            engine: None,
            intake: None,
        }
    }

    /// The candidate being interviewed (or just completed), if any.
    pub fn candidate(&self) -> Option<&Candidate> {
        self.engine.as_ref().map(|e| e.candidate())
    }

    pub fn phase(&self) -> Option<InterviewPhase> {
        self.engine.as_ref().map(|e| e.phase())
    }

    pub fn is_paused(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.is_paused())
    }

    pub fn is_busy(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.is_busy())
    }

    /// Remaining seconds on the current question's countdown.
    pub fn remaining(&self) -> Option<u32> {
        self.engine.as_ref().and_then(|e| e.remaining())
    }

    /// Text of the question currently awaiting an answer.
    pub fn current_question(&self) -> Option<&str> {
        let engine = self.engine.as_ref()?;
        let candidate = engine.candidate();
        candidate
            .answers
            .get(candidate.current_question_index)
            .map(|a| a.question.text.as_str())
    }

    /// The intake field currently being prompted for.
    pub fn pending_intake_field(&self) -> Option<IntakeField> {
        self.intake.as_ref().and_then(|f| f.current_field())
    }

    /// Parses an uploaded resume and starts the intake flow.
    ///
    /// When every identity field was extracted from the resume the interview
    /// starts immediately; otherwise the first missing field is prompted for.
    ///
    /// # Errors
    ///
    /// Rejects the upload while another interview is in progress, and
    /// surfaces `ParseFailure` from the parser so the frontend can offer a
    /// re-upload.
    pub async fn upload_resume(&mut self, file_bytes: &[u8], mime_type: &str) -> Result<IntakeOutcome> {
        if self.has_in_progress_session().await? {
            return Err(InterviewError::validation(
                "an interview is already in progress",
            ));
        }
        let profile = self.resume_parser.parse(file_bytes, mime_type).await?;
        tracing::info!(
            name_extracted = profile.name.is_some(),
            email_extracted = profile.email.is_some(),
            phone_extracted = profile.phone.is_some(),
            "resume parsed"
        );
        let flow = IntakeFlow::new(profile)?;
        if flow.is_complete() {
            let candidate = flow.complete();
            self.intake = None;
            self.begin_interview(candidate).await?;
            return Ok(IntakeOutcome::Started);
        }
        let field = flow
            .current_field()
            .ok_or_else(|| InterviewError::internal("incomplete intake flow with no field"))?;
        self.intake = Some(flow);
        Ok(IntakeOutcome::Prompt(field))
    }

    /// Accepts one value for the intake field currently prompted.
    ///
    /// # Errors
    ///
    /// `Validation` when no intake is running or the value is blank; the
    /// prompt is repeated unchanged.
    pub async fn submit_intake_field(&mut self, value: &str) -> Result<IntakeOutcome> {
        let flow = self
            .intake
            .as_mut()
            .ok_or_else(|| InterviewError::validation("no intake in progress"))?;
        match flow.submit(value)? {
            IntakeStep::Prompt(next) => Ok(IntakeOutcome::Prompt(next)),
            IntakeStep::Complete(candidate) => {
                self.intake = None;
                self.begin_interview(candidate).await?;
                Ok(IntakeOutcome::Started)
            }
        }
    }

    /// Resumes the recovered session exactly where it left off.
    pub async fn resume_session(&mut self, candidate: Candidate) -> Result<()> {
        tracing::info!(candidate = %candidate.id, index = candidate.current_question_index, "resuming session");
        let mut engine = InterviewEngine::new(candidate);
        let command = engine.start();
        self.engine = Some(engine);
        self.run_commands(command).await
    }

    /// Abandons the recovered session: the record is finalized with a zero
    /// score and the sentinel summary, and the active slot is cleared.
    pub async fn abandon_session(&mut self, mut candidate: Candidate) -> Result<()> {
        tracing::info!(candidate = %candidate.id, "abandoning recovered session");
        candidate.abandon();
        self.candidates.save(&candidate).await?;
        self.active_session.clear().await?;
        Ok(())
    }

    /// Submits the typed answer for the current question.
    pub async fn submit_answer(&mut self, text: String) -> Result<()> {
        self.dispatch(InterviewEvent::Submit {
            text,
            origin: SubmitOrigin::User,
        })
        .await
    }

    /// Advances the countdown by one second.
    pub async fn tick(&mut self) -> Result<()> {
        self.dispatch(InterviewEvent::Tick).await
    }

    pub async fn pause(&mut self) -> Result<()> {
        self.dispatch(InterviewEvent::Pause).await
    }

    pub async fn resume(&mut self) -> Result<()> {
        self.dispatch(InterviewEvent::Resume).await
    }

    /// Flushes the live countdown into the snapshot at process teardown so
    /// the next run recovers the same remaining time.
    pub async fn flush(&mut self) -> Result<()> {
        if let Some(engine) = self.engine.as_mut() {
            engine.flush_time_left();
            if engine.candidate().is_in_progress() {
                self.persist().await?;
            }
        }
        Ok(())
    }

    async fn begin_interview(&mut self, candidate: Candidate) -> Result<()> {
        tracing::info!(candidate = %candidate.id, name = %candidate.name, "interview started");
        self.candidates.save(&candidate).await?;
        self.active_session.store(&candidate).await?;
        let mut engine = InterviewEngine::new(candidate);
        let command = engine.start();
        self.engine = Some(engine);
        self.run_commands(command).await
    }

    async fn dispatch(&mut self, event: InterviewEvent) -> Result<()> {
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| InterviewError::validation("no interview in progress"))?;
        let command = engine.handle(event);
        self.persist().await?;
        self.run_commands(command).await
    }

    /// Executes engine commands until the engine settles, persisting after
    /// every applied completion.
    async fn run_commands(&mut self, mut command: Option<EngineCommand>) -> Result<()> {
        while let Some(cmd) = command {
            let event = self.execute(cmd).await?;
            let engine = self
                .engine
                .as_mut()
                .ok_or_else(|| InterviewError::internal("engine dropped mid-command"))?;
            command = engine.handle(event);
            self.persist().await?;
        }
        Ok(())
    }

    /// Runs one collaborator call. Failures become part of the completion
    /// event; the engine decides the fallback.
    async fn execute(&self, command: EngineCommand) -> Result<InterviewEvent> {
        let candidate = self
            .engine
            .as_ref()
            .ok_or_else(|| InterviewError::internal("engine dropped mid-command"))?
            .candidate();
        let event = match command {
            EngineCommand::GenerateQuestion { index, difficulty } => {
                let outcome = self
                    .question_generator
                    .generate(&candidate.resume_text, difficulty)
                    .await;
                InterviewEvent::QuestionReady { index, outcome }
            }
            EngineCommand::EvaluateAnswer {
                index,
                question_text,
                answer_text,
            } => {
                let outcome = self
                    .evaluator
                    .evaluate(&question_text, &answer_text, &candidate.resume_text)
                    .await;
                InterviewEvent::EvaluationReady { index, outcome }
            }
            EngineCommand::Summarize => {
                let outcome = self
                    .summarizer
                    .summarize(&candidate.resume_text, &candidate.answers)
                    .await;
                InterviewEvent::SummaryReady { outcome }
            }
        };
        Ok(event)
    }

    /// Writes the candidate to the roster and mirrors it into (or clears)
    /// the active-session slot.
    async fn persist(&mut self) -> Result<()> {
        let Some(engine) = self.engine.as_ref() else {
            return Ok(());
        };
        let candidate = engine.candidate();
        self.candidates.save(candidate).await?;
        if candidate.is_in_progress() {
            self.active_session.store(candidate).await?;
        } else {
            self.active_session.clear().await?;
        }
        Ok(())
    }

    async fn has_in_progress_session(&self) -> Result<bool> {
        if self
            .engine
            .as_ref()
            .is_some_and(|e| e.candidate().is_in_progress())
        {
            return Ok(true);
        }
        Ok(self
            .active_session
            .load()
            .await?
            .is_some_and(|c| c.is_in_progress()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use intervue_core::candidate::{InterviewAnswer, InterviewStatus, Question, QuestionDifficulty};
    use intervue_core::collab::{Evaluation, ResumeProfile};
    use intervue_core::schedule::{QUESTION_SCHEDULE, TIMEOUT_ANSWER, TOTAL_QUESTIONS};
    use intervue_infrastructure::{
        MemoryStore, StoreActiveSessionRepository, StoreCandidateRepository,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic collaborator stub with a fixed score per answer.
    struct ScriptedCollab {
        profile: ResumeProfile,
        score: u8,
        evaluations: AtomicUsize,
    }

    impl ScriptedCollab {
        fn new(profile: ResumeProfile, score: u8) -> Self {
            Self {
                profile,
                score,
                evaluations: AtomicUsize::new(0),
            }
        }

        fn full_profile(score: u8) -> Self {
            Self::new(
                ResumeProfile {
                    name: Some("Ada Lovelace".to_string()),
                    email: Some("ada@example.com".to_string()),
                    phone: Some("555-0100".to_string()),
                    resume_text: "Analytical engines.".to_string(),
                },
                score,
            )
        }
    }

    #[async_trait]
    impl ResumeParser for ScriptedCollab {
        async fn parse(&self, _file_bytes: &[u8], _mime_type: &str) -> Result<ResumeProfile> {
            Ok(self.profile.clone())
        }
    }

    #[async_trait]
    impl QuestionGenerator for ScriptedCollab {
        async fn generate(
            &self,
            _resume_text: &str,
            difficulty: QuestionDifficulty,
        ) -> Result<String> {
            Ok(format!("A {difficulty} question?"))
        }
    }

    #[async_trait]
    impl AnswerEvaluator for ScriptedCollab {
        async fn evaluate(
            &self,
            _question_text: &str,
            _answer_text: &str,
            _resume_text: &str,
        ) -> Result<Evaluation> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            Ok(Evaluation {
                score: self.score,
                feedback: "noted".to_string(),
            })
        }
    }

    #[async_trait]
    impl Summarizer for ScriptedCollab {
        async fn summarize(
            &self,
            _resume_text: &str,
            _answers: &[InterviewAnswer],
        ) -> Result<String> {
            Ok("Solid performance.".to_string())
        }
    }

    struct Fixture {
        usecase: InterviewUseCase,
        collab: Arc<ScriptedCollab>,
        candidates: Arc<StoreCandidateRepository>,
        active: Arc<StoreActiveSessionRepository>,
    }

    fn fixture(collab: ScriptedCollab) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let candidates = Arc::new(StoreCandidateRepository::new(store.clone()));
        let active = Arc::new(StoreActiveSessionRepository::new(store));
        let collab = Arc::new(collab);
        let usecase = InterviewUseCase::new(
            candidates.clone(),
            active.clone(),
            collab.clone(),
            collab.clone(),
            collab.clone(),
            collab.clone(),
        );
        Fixture {
            usecase,
            collab,
            candidates,
            active,
        }
    }

    fn recovered_candidate() -> Candidate {
        let slot = &QUESTION_SCHEDULE[0];
        let mut answer = InterviewAnswer::new(Question {
            id: 0,
            text: "Recovered question?".to_string(),
            difficulty: slot.difficulty,
            time_limit: slot.time_limit,
        });
        answer.answer_text = String::new();
        Candidate {
            id: "recovered-1".to_string(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "555-0101".to_string(),
            resume_text: "Compilers.".to_string(),
            status: InterviewStatus::InProgress,
            answers: vec![answer],
            current_question_index: 0,
            final_score: None,
            summary: None,
            time_left_on_question: Some(42),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    async fn answer_all_questions(usecase: &mut InterviewUseCase) {
        for i in 0..TOTAL_QUESTIONS {
            assert_eq!(
                usecase.phase(),
                Some(InterviewPhase::AwaitingAnswer),
                "question {i}"
            );
            usecase
                .submit_answer(format!("answer {i}"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn full_interview_completes_and_clears_active_slot() {
        let mut f = fixture(ScriptedCollab::full_profile(10));
        let outcome = f
            .usecase
            .upload_resume(b"pdf bytes", "application/pdf")
            .await
            .unwrap();
        assert_eq!(outcome, IntakeOutcome::Started);

        answer_all_questions(&mut f.usecase).await;

        let candidate = f.usecase.candidate().unwrap();
        assert_eq!(candidate.status, InterviewStatus::Completed);
        assert_eq!(candidate.final_score, Some(100));
        assert_eq!(candidate.summary.as_deref(), Some("Solid performance."));

        // Persisted result matches, and the active slot was cleared.
        let roster = f.candidates.list_all().await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].final_score, Some(100));
        assert_eq!(f.active.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn zero_scores_yield_zero_through_the_stack() {
        let mut f = fixture(ScriptedCollab::full_profile(0));
        f.usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        answer_all_questions(&mut f.usecase).await;
        assert_eq!(f.usecase.candidate().unwrap().final_score, Some(0));
    }

    #[tokio::test]
    async fn intake_prompts_for_missing_fields_in_order() {
        let mut f = fixture(ScriptedCollab::new(
            ResumeProfile {
                name: None,
                email: None,
                phone: Some("555-0100".to_string()),
                resume_text: "Rust.".to_string(),
            },
            5,
        ));
        let outcome = f
            .usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        assert_eq!(outcome, IntakeOutcome::Prompt(IntakeField::Name));
        let outcome = f.usecase.submit_intake_field("Ada").await.unwrap();
        assert_eq!(outcome, IntakeOutcome::Prompt(IntakeField::Email));
        let outcome = f
            .usecase
            .submit_intake_field("ada@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, IntakeOutcome::Started);
        assert_eq!(f.usecase.candidate().unwrap().phone, "555-0100");
    }

    #[tokio::test]
    async fn upload_is_rejected_while_a_session_is_active() {
        let mut f = fixture(ScriptedCollab::full_profile(5));
        f.usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        let err = f
            .usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn resume_session_restores_the_countdown() {
        let mut f = fixture(ScriptedCollab::full_profile(5));
        f.usecase.resume_session(recovered_candidate()).await.unwrap();
        assert_eq!(f.usecase.remaining(), Some(42));
        assert_eq!(f.usecase.phase(), Some(InterviewPhase::AwaitingAnswer));
        f.usecase.tick().await.unwrap();
        assert_eq!(f.usecase.remaining(), Some(41));
    }

    #[tokio::test]
    async fn abandon_session_finalizes_and_clears() {
        let mut f = fixture(ScriptedCollab::full_profile(5));
        let candidate = recovered_candidate();
        f.active.store(&candidate).await.unwrap();

        f.usecase.abandon_session(candidate).await.unwrap();

        let roster = f.candidates.list_all().await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].status, InterviewStatus::Completed);
        assert_eq!(roster[0].final_score, Some(0));
        assert_eq!(
            roster[0].summary.as_deref(),
            Some(intervue_core::schedule::ABANDONED_SUMMARY)
        );
        assert_eq!(f.active.load().await.unwrap(), None);

        // A new upload is accepted afterwards.
        let outcome = f
            .usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        assert_eq!(outcome, IntakeOutcome::Started);
    }

    #[tokio::test]
    async fn countdown_expiry_submits_the_sentinel_answer() {
        let mut f = fixture(ScriptedCollab::full_profile(5));
        f.usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        // First question allows 60 seconds.
        for _ in 0..60 {
            f.usecase.tick().await.unwrap();
        }
        let candidate = f.usecase.candidate().unwrap();
        assert_eq!(candidate.answers[0].answer_text, TIMEOUT_ANSWER);
        assert_eq!(candidate.current_question_index, 1);
        assert_eq!(f.collab.evaluations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pause_survives_a_flush_and_reload() {
        let mut f = fixture(ScriptedCollab::full_profile(5));
        f.usecase
            .upload_resume(b"pdf", "application/pdf")
            .await
            .unwrap();
        for _ in 0..18 {
            f.usecase.tick().await.unwrap();
        }
        f.usecase.pause().await.unwrap();
        f.usecase.flush().await.unwrap();

        let snapshot = f.active.load().await.unwrap().unwrap();
        assert_eq!(snapshot.time_left_on_question, Some(42));
        assert_eq!(snapshot.status, InterviewStatus::InProgress);
    }
}
