//! Interactive interviewee session.
//!
//! Startup resolves any unfinished session (continue or start over), then a
//! resume upload and the intake chat collect the candidate's identity.
//! The interview itself runs on a one-second tick loop; typed lines are
//! answers, `/pause`, `/resume` and `/quit` control the session.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use intervue_application::{IntakeOutcome, InterviewUseCase, RecoveryController, RecoveryDecision};
use intervue_core::candidate::Candidate;
use intervue_core::engine::InterviewPhase;
use intervue_core::error::InterviewError;
use intervue_core::schedule::TOTAL_QUESTIONS;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

pub async fn run(mut usecase: InterviewUseCase, mut recovery: RecoveryController) -> Result<()> {
    match recovery.pending_session().await? {
        Some(candidate) => match prompt_recovery(&candidate)? {
            RecoveryDecision::Continue => {
                println!("{}", "Welcome back. Picking up where you left off.".green());
                usecase.resume_session(candidate).await?;
            }
            RecoveryDecision::StartNew => {
                usecase.abandon_session(candidate).await?;
                println!("{}", "Previous session discarded.".yellow());
                run_intake(&mut usecase).await?;
            }
        },
        None => run_intake(&mut usecase).await?,
    }
    drive(usecase).await
}

/// Asks once whether to continue the recovered session.
fn prompt_recovery(candidate: &Candidate) -> Result<RecoveryDecision> {
    println!();
    println!(
        "{}",
        format!(
            "An unfinished interview for {} was found (question {} of {}).",
            candidate.name.bold(),
            candidate.current_question_index + 1,
            TOTAL_QUESTIONS
        )
    );
    loop {
        let choice = read_line("Continue it, or start a new one? [c/n] ")?;
        match choice.to_lowercase().as_str() {
            "c" | "continue" => return Ok(RecoveryDecision::Continue),
            "n" | "new" => return Ok(RecoveryDecision::StartNew),
            _ => println!("Please answer 'c' or 'n'."),
        }
    }
}

/// Resume upload plus the chat that fills in missing identity fields.
async fn run_intake(usecase: &mut InterviewUseCase) -> Result<()> {
    let mut outcome = upload_resume(usecase).await?;
    loop {
        match outcome {
            IntakeOutcome::Started => return Ok(()),
            IntakeOutcome::Prompt(field) => {
                let value = read_line(&format!("Please provide your {field}: "))?;
                outcome = match usecase.submit_intake_field(&value).await {
                    Ok(next) => next,
                    // Blank input repeats the same prompt.
                    Err(err) if err.is_validation() => IntakeOutcome::Prompt(field),
                    Err(err) => return Err(err.into()),
                };
            }
        }
    }
}

async fn upload_resume(usecase: &mut InterviewUseCase) -> Result<IntakeOutcome> {
    loop {
        let path = read_line("Path to your resume (PDF or DOCX): ")?;
        if path.is_empty() {
            continue;
        }
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                println!("{}", format!("Could not read {path}: {err}").red());
                continue;
            }
        };
        let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
        println!("{}", "Reading your resume...".dimmed());
        match usecase.upload_resume(&bytes, mime_type.essence_str()).await {
            Ok(outcome) => return Ok(outcome),
            Err(InterviewError::ParseFailure(message)) => {
                println!("{}", message.red());
            }
            Err(err) => return Err(err).context("resume upload failed"),
        }
    }
}

/// The timed question loop.
async fn drive(mut usecase: InterviewUseCase) -> Result<()> {
    let mut lines = spawn_stdin_reader();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut shown_question: Option<usize> = None;

    loop {
        render_question(&usecase, &mut shown_question);
        if usecase.phase() == Some(InterviewPhase::Completed) {
            render_result(&usecase);
            return Ok(());
        }

        tokio::select! {
            _ = interval.tick() => {
                usecase.tick().await?;
                render_countdown(&usecase);
            }
            _ = tokio::signal::ctrl_c() => {
                usecase.flush().await?;
                println!("\n{}", "Session saved. Run intervue again to continue.".yellow());
                return Ok(());
            }
            line = lines.recv() => match line {
                Some(line) => {
                    if !handle_line(&mut usecase, line).await? {
                        return Ok(());
                    }
                }
                None => {
                    usecase.flush().await?;
                    return Ok(());
                }
            }
        }
    }
}

/// Returns `false` when the session loop should end.
async fn handle_line(usecase: &mut InterviewUseCase, line: String) -> Result<bool> {
    match line.trim() {
        "/pause" => {
            usecase.pause().await?;
            if usecase.is_paused() {
                println!("{}", "Paused. Type /resume to continue.".yellow());
            }
        }
        "/resume" => {
            usecase.resume().await?;
            if !usecase.is_paused() {
                println!("{}", "Resumed.".green());
            }
        }
        "/quit" => {
            usecase.flush().await?;
            println!("{}", "Session saved. Run intervue again to continue.".yellow());
            return Ok(false);
        }
        answer => {
            if usecase.phase() == Some(InterviewPhase::AwaitingAnswer) && !usecase.is_paused() {
                println!("{}", "Evaluating your answer...".dimmed());
            }
            usecase.submit_answer(answer.to_string()).await?;
        }
    }
    Ok(true)
}

/// Prints the current question the first time it becomes answerable.
fn render_question(usecase: &InterviewUseCase, shown: &mut Option<usize>) {
    if usecase.phase() != Some(InterviewPhase::AwaitingAnswer) {
        return;
    }
    let Some(candidate) = usecase.candidate() else {
        return;
    };
    let index = candidate.current_question_index;
    if *shown == Some(index) {
        return;
    }
    *shown = Some(index);

    let question = &candidate.answers[index].question;
    println!();
    println!(
        "{} {}",
        format!("Question {} of {}", index + 1, TOTAL_QUESTIONS).bold(),
        format!("[{} - {}s]", question.difficulty, question.time_limit).cyan()
    );
    println!("{}", question.text);
    print!("> ");
    let _ = io::stdout().flush();
}

fn render_countdown(usecase: &InterviewUseCase) {
    if usecase.phase() != Some(InterviewPhase::AwaitingAnswer) || usecase.is_paused() {
        return;
    }
    match usecase.remaining() {
        Some(10) => println!("{}", "10 seconds left!".yellow()),
        Some(seconds @ 1..=5) => println!("{}", format!("{seconds}...").red()),
        _ => {}
    }
}

fn render_result(usecase: &InterviewUseCase) {
    let Some(candidate) = usecase.candidate() else {
        return;
    };
    let score = candidate.final_score.unwrap_or(0);
    let colored_score = match score {
        80..=100 => score.to_string().green(),
        60..=79 => score.to_string().yellow(),
        _ => score.to_string().red(),
    };
    println!();
    println!("{}", "Interview complete!".bold().green());
    println!("Final score: {colored_score}/100");
    if let Some(summary) = &candidate.summary {
        println!();
        println!("{summary}");
    }
}

/// Forwards stdin lines into the async loop.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        bail!("input closed");
    }
    Ok(line.trim().to_string())
}
