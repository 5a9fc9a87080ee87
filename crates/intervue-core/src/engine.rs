//! The interview session state machine.
//!
//! [`InterviewEngine`] owns one candidate's in-progress record and drives it
//! through question generation, countdown timing, answer submission,
//! evaluation and completion. It is a synchronous transition function over
//! [`InterviewEvent`]s: each event runs to completion and may emit at most
//! one [`EngineCommand`] for the shell to execute asynchronously. While a
//! command is outstanding the engine is *busy* and ignores submissions,
//! pauses and ticks - this single flag is the double-submit guard.
//!
//! Collaborator failures never block progression: a failed generation,
//! evaluation or summarization is replaced by its fixed fallback value here,
//! at the moment the completion event is applied.

use crate::candidate::{
    Candidate, InterviewAnswer, InterviewStatus, Question, compute_final_score,
};
use crate::collab::Evaluation;
use crate::event::{EngineCommand, InterviewEvent, SubmitOrigin};
use crate::schedule::{
    EVALUATION_FALLBACK_FEEDBACK, FALLBACK_QUESTION, QUESTION_SCHEDULE, SUMMARY_FALLBACK,
    TIMEOUT_ANSWER, TOTAL_QUESTIONS,
};
use crate::timer::{CountdownTimer, TimerTick};

/// The collaborator call currently outstanding, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingCall {
    Question(usize),
    Evaluation(usize),
    Summary,
}

/// Observable phase of the session, derived from the candidate record and
/// the busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum InterviewPhase {
    /// The next question has not been generated yet.
    AwaitingQuestion,
    /// A question is on the table and the countdown may be running.
    AwaitingAnswer,
    /// A submitted answer awaits its score.
    Evaluating,
    /// All answers are in; the final summary is being written.
    Summarizing,
    Completed,
}

/// State machine for a single in-progress interview session.
pub struct InterviewEngine {
    candidate: Candidate,
    timer: CountdownTimer,
    paused: bool,
    busy: Option<PendingCall>,
}

impl InterviewEngine {
    /// Wraps a candidate record, either freshly created by intake or
    /// recovered from the active-session snapshot.
    pub fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            timer: CountdownTimer::new(),
            paused: false,
            busy: None,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Hands the record back, e.g. after completion.
    pub fn into_candidate(self) -> Candidate {
        self.candidate
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True while a collaborator call is outstanding ("loading").
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Remaining seconds on the current question, if a countdown exists.
    pub fn remaining(&self) -> Option<u32> {
        self.candidate.time_left_on_question
    }

    pub fn phase(&self) -> InterviewPhase {
        if self.candidate.status == InterviewStatus::Completed {
            return InterviewPhase::Completed;
        }
        let index = self.candidate.current_question_index;
        if matches!(self.busy, Some(PendingCall::Summary)) || index >= TOTAL_QUESTIONS {
            return InterviewPhase::Summarizing;
        }
        match self.candidate.answers.get(index) {
            None => InterviewPhase::AwaitingQuestion,
            Some(answer) if answer.answer_text.is_empty() => InterviewPhase::AwaitingAnswer,
            Some(_) => InterviewPhase::Evaluating,
        }
    }

    /// Kicks the session off (or back off, after recovery) from whatever
    /// point the record is at.
    ///
    /// Returns the command to execute next, or `None` when the session is
    /// mid-countdown (the timer has been restored from the persisted
    /// remaining seconds) or already completed.
    pub fn start(&mut self) -> Option<EngineCommand> {
        if self.candidate.status != InterviewStatus::InProgress || self.busy.is_some() {
            return None;
        }
        match self.phase() {
            InterviewPhase::AwaitingQuestion => self.request_question(),
            InterviewPhase::AwaitingAnswer => {
                let index = self.candidate.current_question_index;
                let limit = self.candidate.answers[index].question.time_limit;
                let remaining = self.candidate.time_left_on_question.unwrap_or(limit);
                self.candidate.time_left_on_question = Some(remaining);
                self.timer.start(remaining);
                tracing::debug!(index, remaining, "restored countdown");
                None
            }
            // Crashed while an evaluation was in flight: the answer text is
            // recorded but unscored, so request the evaluation again.
            InterviewPhase::Evaluating => {
                let index = self.candidate.current_question_index;
                self.busy = Some(PendingCall::Evaluation(index));
                Some(EngineCommand::EvaluateAnswer {
                    index,
                    question_text: self.candidate.answers[index].question.text.clone(),
                    answer_text: self.candidate.answers[index].answer_text.clone(),
                })
            }
            InterviewPhase::Summarizing => {
                self.busy = Some(PendingCall::Summary);
                Some(EngineCommand::Summarize)
            }
            InterviewPhase::Completed => None,
        }
    }

    /// Applies one event.
    ///
    /// Illegal or stale events (submit while evaluating, pause outside a
    /// countdown, a completion for a question that has moved on) are dropped
    /// silently, per the input-boundary validation policy.
    pub fn handle(&mut self, event: InterviewEvent) -> Option<EngineCommand> {
        match event {
            InterviewEvent::Tick => self.on_tick(),
            InterviewEvent::Pause => {
                self.on_pause();
                None
            }
            InterviewEvent::Resume => {
                self.on_resume();
                None
            }
            InterviewEvent::Submit { text, origin } => self.on_submit(text, origin),
            InterviewEvent::QuestionReady { index, outcome } => {
                self.on_question_ready(index, outcome.unwrap_or_else(|err| {
                    tracing::warn!(index, %err, "question generation failed, using fallback");
                    FALLBACK_QUESTION.to_string()
                }))
            }
            InterviewEvent::EvaluationReady { index, outcome } => {
                self.on_evaluation_ready(index, outcome.unwrap_or_else(|err| {
                    tracing::warn!(index, %err, "evaluation failed, using fallback");
                    Evaluation {
                        score: 0,
                        feedback: EVALUATION_FALLBACK_FEEDBACK.to_string(),
                    }
                }))
            }
            InterviewEvent::SummaryReady { outcome } => {
                self.on_summary_ready(outcome.unwrap_or_else(|err| {
                    tracing::warn!(%err, "summarization failed, using fallback");
                    SUMMARY_FALLBACK.to_string()
                }));
                None
            }
        }
    }

    /// Flushes the live countdown value onto the record for a synchronous
    /// persist at process teardown.
    pub fn flush_time_left(&mut self) {
        if self.candidate.is_in_progress() && !self.paused && self.timer.is_running() {
            self.candidate.time_left_on_question = Some(self.timer.remaining());
            self.candidate.touch();
        }
    }

    fn on_tick(&mut self) -> Option<EngineCommand> {
        if self.paused || self.busy.is_some() {
            return None;
        }
        match self.timer.tick() {
            TimerTick::Idle => None,
            TimerTick::Running(remaining) => {
                // Mirrored onto the record every tick so a crash mid-question
                // recovers the same remaining time.
                self.candidate.time_left_on_question = Some(remaining);
                None
            }
            TimerTick::Expired => {
                tracing::info!(
                    index = self.candidate.current_question_index,
                    "countdown expired, submitting sentinel answer"
                );
                self.submit_answer(TIMEOUT_ANSWER.to_string())
            }
        }
    }

    fn on_pause(&mut self) {
        if self.paused || self.busy.is_some() || self.phase() != InterviewPhase::AwaitingAnswer {
            tracing::debug!("pause ignored outside AwaitingAnswer");
            return;
        }
        // Persist the exact remaining seconds before the timer stops.
        self.candidate.time_left_on_question = Some(self.timer.remaining());
        self.candidate.touch();
        self.timer.stop();
        self.paused = true;
    }

    fn on_resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        let index = self.candidate.current_question_index;
        let limit = self.candidate.answers[index].question.time_limit;
        let remaining = self.candidate.time_left_on_question.unwrap_or(limit);
        self.timer.start(remaining);
    }

    fn on_submit(&mut self, text: String, origin: SubmitOrigin) -> Option<EngineCommand> {
        if self.busy.is_some() || self.paused || self.phase() != InterviewPhase::AwaitingAnswer {
            tracing::debug!(?origin, "submission ignored, no answer awaited");
            return None;
        }
        let text = match origin {
            SubmitOrigin::User => text,
            SubmitOrigin::Timeout => TIMEOUT_ANSWER.to_string(),
        };
        self.submit_answer(text)
    }

    fn submit_answer(&mut self, text: String) -> Option<EngineCommand> {
        self.timer.stop();
        let index = self.candidate.current_question_index;
        let answer = &mut self.candidate.answers[index];
        answer.answer_text = text.clone();
        let question_text = answer.question.text.clone();
        self.candidate.time_left_on_question = None;
        self.candidate.touch();
        self.busy = Some(PendingCall::Evaluation(index));
        Some(EngineCommand::EvaluateAnswer {
            index,
            question_text,
            answer_text: text,
        })
    }

    fn request_question(&mut self) -> Option<EngineCommand> {
        let index = self.candidate.current_question_index;
        let slot = &QUESTION_SCHEDULE[index];
        self.busy = Some(PendingCall::Question(index));
        Some(EngineCommand::GenerateQuestion {
            index,
            difficulty: slot.difficulty,
        })
    }

    fn on_question_ready(&mut self, index: usize, text: String) -> Option<EngineCommand> {
        if self.busy != Some(PendingCall::Question(index))
            || index != self.candidate.current_question_index
            || self.candidate.answers.len() != index
        {
            tracing::debug!(index, "stale question result dropped");
            return None;
        }
        self.busy = None;
        let slot = &QUESTION_SCHEDULE[index];
        self.candidate.answers.push(InterviewAnswer::new(Question {
            id: index,
            text,
            difficulty: slot.difficulty,
            time_limit: slot.time_limit,
        }));
        self.candidate.time_left_on_question = Some(slot.time_limit);
        self.candidate.touch();
        self.timer.start(slot.time_limit);
        None
    }

    fn on_evaluation_ready(&mut self, index: usize, evaluation: Evaluation) -> Option<EngineCommand> {
        if self.busy != Some(PendingCall::Evaluation(index))
            || index != self.candidate.current_question_index
        {
            tracing::debug!(index, "stale evaluation result dropped");
            return None;
        }
        self.busy = None;
        let answer = &mut self.candidate.answers[index];
        answer.score = Some(evaluation.score.min(10));
        answer.feedback = Some(evaluation.feedback);
        self.candidate.current_question_index += 1;
        self.candidate.touch();

        if self.candidate.current_question_index == TOTAL_QUESTIONS {
            self.busy = Some(PendingCall::Summary);
            Some(EngineCommand::Summarize)
        } else {
            self.request_question()
        }
    }

    fn on_summary_ready(&mut self, summary: String) {
        if self.busy != Some(PendingCall::Summary) {
            tracing::debug!("stale summary result dropped");
            return;
        }
        self.busy = None;
        self.candidate.summary = Some(summary);
        self.candidate.final_score = Some(compute_final_score(&self.candidate.answers));
        self.candidate.status = InterviewStatus::Completed;
        self.candidate.time_left_on_question = None;
        self.candidate.touch();
        tracing::info!(
            candidate = %self.candidate.id,
            final_score = self.candidate.final_score,
            "interview completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterviewError;

    fn fresh_candidate() -> Candidate {
        Candidate {
            id: "cand-1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            resume_text: "Analytical engines.".to_string(),
            status: InterviewStatus::InProgress,
            answers: Vec::new(),
            current_question_index: 0,
            final_score: None,
            summary: None,
            time_left_on_question: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn deliver_question(engine: &mut InterviewEngine, index: usize) {
        let cmd = engine.handle(InterviewEvent::QuestionReady {
            index,
            outcome: Ok(format!("Question {index}?")),
        });
        assert_eq!(cmd, None);
        assert_eq!(engine.phase(), InterviewPhase::AwaitingAnswer);
    }

    fn submit_and_score(engine: &mut InterviewEngine, index: usize, score: u8) -> Option<EngineCommand> {
        let cmd = engine.handle(InterviewEvent::Submit {
            text: format!("answer {index}"),
            origin: SubmitOrigin::User,
        });
        assert!(matches!(
            cmd,
            Some(EngineCommand::EvaluateAnswer { index: i, .. }) if i == index
        ));
        engine.handle(InterviewEvent::EvaluationReady {
            index,
            outcome: Ok(Evaluation {
                score,
                feedback: "noted".to_string(),
            }),
        })
    }

    /// Drives a full six-question interview with the given per-answer scores.
    fn run_full_interview(scores: [u8; TOTAL_QUESTIONS]) -> Candidate {
        let mut engine = InterviewEngine::new(fresh_candidate());
        let mut cmd = engine.start();
        for (index, score) in scores.into_iter().enumerate() {
            assert!(matches!(
                cmd,
                Some(EngineCommand::GenerateQuestion { index: i, .. }) if i == index
            ));
            deliver_question(&mut engine, index);
            // Index advances by exactly one per evaluated answer.
            assert_eq!(engine.candidate().current_question_index, index);
            cmd = submit_and_score(&mut engine, index, score);
            assert_eq!(engine.candidate().current_question_index, index + 1);
        }
        assert_eq!(cmd, Some(EngineCommand::Summarize));
        engine.handle(InterviewEvent::SummaryReady {
            outcome: Ok("Strong fundamentals.".to_string()),
        });
        engine.into_candidate()
    }

    #[test]
    fn perfect_scores_yield_one_hundred() {
        let candidate = run_full_interview([10; 6]);
        assert_eq!(candidate.status, InterviewStatus::Completed);
        assert_eq!(candidate.final_score, Some(100));
        assert_eq!(candidate.summary.as_deref(), Some("Strong fundamentals."));
        assert_eq!(candidate.time_left_on_question, None);
    }

    #[test]
    fn zero_scores_yield_zero() {
        let candidate = run_full_interview([0; 6]);
        assert_eq!(candidate.final_score, Some(0));
    }

    #[test]
    fn half_and_half_yields_fifty() {
        let candidate = run_full_interview([10, 10, 10, 0, 0, 0]);
        assert_eq!(candidate.final_score, Some(50));
    }

    #[test]
    fn countdown_expiry_submits_sentinel_answer() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);

        // First question allows 60 seconds.
        let mut command = None;
        for _ in 0..60 {
            command = engine.handle(InterviewEvent::Tick);
        }
        match command {
            Some(EngineCommand::EvaluateAnswer { index, answer_text, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(answer_text, TIMEOUT_ANSWER);
            }
            other => panic!("expected evaluation command, got {other:?}"),
        }
        assert_eq!(engine.candidate().answers[0].answer_text, TIMEOUT_ANSWER);
        assert_eq!(engine.candidate().time_left_on_question, None);

        // Further ticks while evaluating are no-ops.
        assert_eq!(engine.handle(InterviewEvent::Tick), None);
    }

    #[test]
    fn double_submit_mutates_the_answer_exactly_once() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);

        let first = engine.handle(InterviewEvent::Submit {
            text: "real answer".to_string(),
            origin: SubmitOrigin::User,
        });
        assert!(first.is_some());

        // A queued expiry or second click while evaluating must be a no-op.
        let second = engine.handle(InterviewEvent::Submit {
            text: "other answer".to_string(),
            origin: SubmitOrigin::User,
        });
        assert_eq!(second, None);
        assert_eq!(engine.candidate().answers[0].answer_text, "real answer");
    }

    #[test]
    fn pause_and_resume_preserve_remaining_time() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);

        for _ in 0..10 {
            engine.handle(InterviewEvent::Tick);
        }
        assert_eq!(engine.remaining(), Some(50));

        engine.handle(InterviewEvent::Pause);
        assert!(engine.is_paused());
        assert_eq!(engine.remaining(), Some(50));

        // Ticks while paused change nothing.
        engine.handle(InterviewEvent::Tick);
        assert_eq!(engine.remaining(), Some(50));

        engine.handle(InterviewEvent::Resume);
        assert!(!engine.is_paused());
        assert_eq!(engine.remaining(), Some(50));
        engine.handle(InterviewEvent::Tick);
        assert_eq!(engine.remaining(), Some(49));
    }

    #[test]
    fn pause_is_ignored_outside_awaiting_answer() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        // Still awaiting the generated question.
        engine.handle(InterviewEvent::Pause);
        assert!(!engine.is_paused());
    }

    #[test]
    fn recovery_restores_persisted_remaining_time() {
        let mut candidate = fresh_candidate();
        let slot = &QUESTION_SCHEDULE[0];
        candidate.answers.push(InterviewAnswer::new(Question {
            id: 0,
            text: "Recovered question?".to_string(),
            difficulty: slot.difficulty,
            time_limit: slot.time_limit,
        }));
        candidate.time_left_on_question = Some(42);

        let mut engine = InterviewEngine::new(candidate);
        assert_eq!(engine.start(), None);
        assert_eq!(engine.remaining(), Some(42));
        engine.handle(InterviewEvent::Tick);
        assert_eq!(engine.remaining(), Some(41));
    }

    #[test]
    fn recovery_mid_evaluation_requests_the_score_again() {
        let mut candidate = fresh_candidate();
        let slot = &QUESTION_SCHEDULE[0];
        let mut answer = InterviewAnswer::new(Question {
            id: 0,
            text: "Q?".to_string(),
            difficulty: slot.difficulty,
            time_limit: slot.time_limit,
        });
        answer.answer_text = "submitted before the crash".to_string();
        candidate.answers.push(answer);

        let mut engine = InterviewEngine::new(candidate);
        assert!(matches!(
            engine.start(),
            Some(EngineCommand::EvaluateAnswer { index: 0, .. })
        ));
    }

    #[test]
    fn generation_failure_falls_back_to_generic_question() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        engine.handle(InterviewEvent::QuestionReady {
            index: 0,
            outcome: Err(InterviewError::GenerationFailure("api down".to_string())),
        });
        assert_eq!(engine.phase(), InterviewPhase::AwaitingAnswer);
        assert_eq!(engine.candidate().answers[0].question.text, FALLBACK_QUESTION);
    }

    #[test]
    fn evaluation_failure_scores_zero_with_fallback_feedback() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);
        engine.handle(InterviewEvent::Submit {
            text: "an answer".to_string(),
            origin: SubmitOrigin::User,
        });
        let next = engine.handle(InterviewEvent::EvaluationReady {
            index: 0,
            outcome: Err(InterviewError::EvaluationFailure("api down".to_string())),
        });
        assert!(matches!(
            next,
            Some(EngineCommand::GenerateQuestion { index: 1, .. })
        ));
        let answer = &engine.candidate().answers[0];
        assert_eq!(answer.score, Some(0));
        assert_eq!(answer.feedback.as_deref(), Some(EVALUATION_FALLBACK_FEEDBACK));
    }

    #[test]
    fn summary_failure_still_completes_with_local_score() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        let mut cmd = engine.start();
        for index in 0..TOTAL_QUESTIONS {
            assert!(cmd.is_some());
            deliver_question(&mut engine, index);
            cmd = submit_and_score(&mut engine, index, 7);
        }
        engine.handle(InterviewEvent::SummaryReady {
            outcome: Err(InterviewError::SummarizationFailure("api down".to_string())),
        });
        let candidate = engine.candidate();
        assert_eq!(candidate.status, InterviewStatus::Completed);
        assert_eq!(candidate.summary.as_deref(), Some(SUMMARY_FALLBACK));
        // round(100 * 42 / 60) = 70
        assert_eq!(candidate.final_score, Some(70));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        // Result for a question ordinal the engine never asked for.
        engine.handle(InterviewEvent::QuestionReady {
            index: 3,
            outcome: Ok("wrong slot".to_string()),
        });
        assert_eq!(engine.candidate().answers.len(), 0);
        assert!(engine.is_busy());

        deliver_question(&mut engine, 0);
        // Evaluation arriving with no submission outstanding.
        engine.handle(InterviewEvent::EvaluationReady {
            index: 0,
            outcome: Ok(Evaluation {
                score: 10,
                feedback: "ghost".to_string(),
            }),
        });
        assert_eq!(engine.candidate().answers[0].score, None);
        assert_eq!(engine.candidate().current_question_index, 0);
    }

    #[test]
    fn scores_above_ten_are_clamped() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);
        engine.handle(InterviewEvent::Submit {
            text: "answer".to_string(),
            origin: SubmitOrigin::User,
        });
        engine.handle(InterviewEvent::EvaluationReady {
            index: 0,
            outcome: Ok(Evaluation {
                score: 200,
                feedback: "overenthusiastic".to_string(),
            }),
        });
        assert_eq!(engine.candidate().answers[0].score, Some(10));
    }

    #[test]
    fn flush_records_live_countdown_for_teardown() {
        let mut engine = InterviewEngine::new(fresh_candidate());
        engine.start();
        deliver_question(&mut engine, 0);
        for _ in 0..18 {
            engine.handle(InterviewEvent::Tick);
        }
        engine.flush_time_left();
        assert_eq!(engine.candidate().time_left_on_question, Some(42));
    }
}
