use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use coursegrade::error::AppError;

use crate::demo::{run_demo, run_summary, DemoArgs, SummaryArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "CourseGrade",
    about = "Track course grades with weighted criteria and roll them up into a semester GPA",
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
    /// Print the active semester's GPA summary and grade distribution
    Summary(SummaryArgs),
    /// Run a scripted editing session against an in-memory gradebook
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured gradebook file
    #[arg(long)]
    pub(crate) data_path: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Summary(args) => run_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}
