use crate::commands::{run_batch, run_duplicates, run_model_status, run_score};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sentry_risk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Sentry Risk",
    about = "Score sponsor cases and serve the risk scoring API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single evaluation request read from a JSON file
    Score(ScoreArgs),
    /// Score every row of a case export CSV and print a tier summary
    Batch(BatchArgs),
    /// Inspect the configured model artifact
    Model {
        #[command(subcommand)]
        command: ModelCommand,
    },
    /// List roster entries that look like duplicates of a sponsor
    Duplicates(DuplicateArgs),
}

#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Report whether the model loads and which feature schema it declares
    Status(ModelArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Model artifact to load instead of SENTRY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding `record` and `risk_factors`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Model artifact to load instead of SENTRY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Case export with a header row
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Model artifact to load instead of SENTRY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ModelArgs {
    /// Model artifact to probe instead of SENTRY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DuplicateArgs {
    /// Sponsor registry export (ID, names, dob, contact and hash columns)
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Roster ID of the sponsor to check
    #[arg(long)]
    pub(crate) id: String,
    /// Similarity a sponsor id must exceed; defaults to SENTRY_DUPLICATE_THRESHOLD
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) threshold: Option<u8>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
        Command::Model {
            command: ModelCommand::Status(args),
        } => run_model_status(args),
        Command::Duplicates(args) => run_duplicates(args),
    }
}
