use crate::matching::{run_rank, run_score, RankArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use medibytes::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "medibytes-api",
    about = "Run the MediBytes donor registry or score donor/recipient pairs from the command line",
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
    /// Score or rank donors without starting the server
    Match {
        #[command(subcommand)]
        command: MatchCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MatchCommand {
    /// Rank donors from a CSV export for one recipient
    Rank(RankArgs),
    /// Score a single donor/recipient pair with a factor breakdown
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory registry from a donor CSV export
    #[arg(long)]
    pub(crate) donors_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match {
            command: MatchCommand::Rank(args),
        } => run_rank(args),
        Command::Match {
            command: MatchCommand::Score(args),
        } => run_score(args),
    }
}
