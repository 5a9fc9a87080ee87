//! Interviewer view: the candidate roster and per-candidate detail.

use anyhow::{Result, bail};
use colored::Colorize;
use intervue_application::RosterQuery;
use intervue_core::candidate::{Candidate, InterviewStatus};
use intervue_core::repository::CandidateRepository;
use intervue_core::schedule::TOTAL_QUESTIONS;
use std::sync::Arc;

pub async fn run(
    candidates: Arc<dyn CandidateRepository>,
    query: RosterQuery,
    id: Option<String>,
) -> Result<()> {
    if let Some(id) = id {
        let candidate = match candidates.find_by_id(&id).await? {
            Some(candidate) => candidate,
            None => bail!("no candidate with id {id}"),
        };
        render_detail(&candidate);
        return Ok(());
    }

    let roster = candidates.list_all().await?;
    let rows = query.apply(&roster);
    if rows.is_empty() {
        println!("No candidates yet.");
        return Ok(());
    }

    println!(
        "{:<36}  {:<24}  {:<12}  {:<9}  {}",
        "ID".bold(),
        "Name".bold(),
        "Status".bold(),
        "Progress".bold(),
        "Score".bold()
    );
    for candidate in &rows {
        println!(
            "{:<36}  {:<24}  {:<12}  {:<9}  {}",
            candidate.id,
            candidate.name,
            status_label(candidate.status),
            format!(
                "{}/{}",
                candidate.current_question_index.min(TOTAL_QUESTIONS),
                TOTAL_QUESTIONS
            ),
            candidate
                .final_score
                .map_or("-".to_string(), |s| s.to_string()),
        );
    }
    Ok(())
}

fn status_label(status: InterviewStatus) -> colored::ColoredString {
    match status {
        InterviewStatus::NotStarted => status.to_string().dimmed(),
        InterviewStatus::InProgress => status.to_string().yellow(),
        InterviewStatus::Completed => status.to_string().green(),
    }
}

fn render_detail(candidate: &Candidate) {
    println!("{}", candidate.name.bold());
    println!("  {} | {}", candidate.email, candidate.phone);
    println!("  Status: {}", status_label(candidate.status));
    if let Some(score) = candidate.final_score {
        println!("  Final score: {score}/100");
    }
    if let Some(summary) = &candidate.summary {
        println!();
        println!("  {summary}");
    }

    for answer in &candidate.answers {
        println!();
        println!(
            "  {} {}",
            format!("Q{}.", answer.question.id + 1).bold(),
            format!("[{}]", answer.question.difficulty).cyan()
        );
        println!("  {}", answer.question.text);
        if !answer.answer_text.is_empty() {
            println!("  {} {}", "A:".bold(), answer.answer_text);
        }
        if let Some(score) = answer.score {
            println!("  Score: {score}/10");
        }
        if let Some(feedback) = &answer.feedback {
            println!("  {feedback}");
        }
    }
}
