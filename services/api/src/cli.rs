use crate::demo::{run_compute, run_demo, run_export, ComputeArgs, DemoArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sttk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "STTK Penalty Ledger",
    about = "Compute, review and serve STTK stock write-off penalty ledgers",
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
    /// Print the penalty ledger for a JSON penalty input document
    Compute(ComputeArgs),
    /// Run an end-to-end demo: draft, submit, approve and dashboards
    Demo(DemoArgs),
    /// Write the demo report history as CSV
    Export(ExportArgs),
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
        Command::Compute(args) => run_compute(args),
        Command::Demo(args) => run_demo(args),
        Command::Export(args) => run_export(args),
    }
}
