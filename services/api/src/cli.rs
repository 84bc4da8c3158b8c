use crate::demo::{run_demo, run_link, run_questions, run_score, DemoArgs, LinkArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use soullink::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SoulLink",
    about = "Run the SoulLink compatibility scan service or take the quiz from the command line",
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
    /// Inspect the question bank, score answers, and build share links
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },
    /// Walk through a sample quiz taker end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// List the active question bank grouped by pillar
    Questions,
    /// Restore a share-link query and print pillar scores and trust
    Score(ScoreArgs),
    /// Build a share link from a name and answers
    Link(LinkArgs),
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
        Command::Quiz {
            command: QuizCommand::Questions,
        } => run_questions(),
        Command::Quiz {
            command: QuizCommand::Score(args),
        } => run_score(args),
        Command::Quiz {
            command: QuizCommand::Link(args),
        } => run_link(args),
        Command::Demo(args) => run_demo(args),
    }
}
