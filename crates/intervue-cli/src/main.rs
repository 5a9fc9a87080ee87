use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use intervue_application::{InterviewUseCase, RecoveryController, RosterQuery, SortDirection, SortKey};
use intervue_infrastructure::{JsonFileStore, StoreActiveSessionRepository, StoreCandidateRepository};
use intervue_interaction::GeminiClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "intervue")]
#[command(about = "Intervue - timed AI-assisted technical interviews", long_about = None)]
struct Cli {
    /// Path to the JSON store file (default: ~/.intervue/store.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interview session (the default)
    Interview,
    /// Interviewer view over all candidates
    Roster {
        /// Case-insensitive search over name and email
        #[arg(long)]
        search: Option<String>,
        /// Column to sort by
        #[arg(long, value_enum, default_value = "score")]
        sort: SortColumn,
        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
        /// Show the full record for one candidate
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortColumn {
    Name,
    Status,
    Progress,
    Score,
}

impl From<SortColumn> for SortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => SortKey::Name,
            SortColumn::Status => SortKey::Status,
            SortColumn::Progress => SortKey::Progress,
            SortColumn::Score => SortKey::FinalScore,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.store {
        Some(path) => JsonFileStore::new(path)?,
        None => JsonFileStore::default_location()?,
    };
    let store = Arc::new(store);
    let candidates = Arc::new(StoreCandidateRepository::new(store.clone()));
    let active_session = Arc::new(StoreActiveSessionRepository::new(store));

    match cli.command.unwrap_or(Commands::Interview) {
        Commands::Interview => {
            let gemini = Arc::new(
                GeminiClient::try_from_env()
                    .context("set GEMINI_API_KEY to run an interview")?,
            );
            let usecase = InterviewUseCase::new(
                candidates.clone(),
                active_session.clone(),
                gemini.clone(),
                gemini.clone(),
                gemini.clone(),
                gemini,
            );
            let recovery = RecoveryController::new(candidates, active_session);
            commands::interview::run(usecase, recovery).await
        }
        Commands::Roster {
            search,
            sort,
            ascending,
            id,
        } => {
            let query = RosterQuery {
                search: search.unwrap_or_default(),
                key: sort.into(),
                direction: if ascending {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                },
            };
            commands::roster::run(candidates, query, id).await
        }
    }
}
