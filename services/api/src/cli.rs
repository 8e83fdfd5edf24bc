use crate::demo::{run_assess, run_demo, run_report, AssessArgs, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_attendance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HR Attendance",
    about = "Run the HR attendance service or inspect attendance data from the command line",
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
    /// Work out lateness for a single check-in against a shift
    Assess(AssessArgs),
    /// Summarise an attendance CSV export
    Report(ReportArgs),
    /// Seed an in-memory team and walk through a working day and an evaluation cycle
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
