use crate::plan::{run_demo, run_optimize, DemoArgs, OptimizeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use shift_optimizer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Shift Optimizer",
    about = "Build constraint-respecting shift rosters over HTTP or from the command line",
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
    /// Optimize a roster from employees.csv and shifts.csv exports
    Optimize(OptimizeArgs),
    /// Solve a small built-in café roster and print the result
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
        Command::Optimize(args) => run_optimize(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
