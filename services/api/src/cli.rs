use crate::offline::{run_check_classifier, run_qualify, QualifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leadqual::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Qualification Service",
    about = "Score sales leads with deterministic rules and an AI intent classifier",
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
    /// Score a lead CSV against an offer file without starting the server
    Qualify(QualifyArgs),
    /// Probe the configured remote classifier and report round-trip health
    CheckClassifier,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Qualify(args) => run_qualify(args).await,
        Command::CheckClassifier => run_check_classifier().await,
    }
}
