use crate::report::{run_export, run_report, ExportArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payscale::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "payscale",
    about = "Serve, summarize and export the salary dashboard from the command line",
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
    /// Print salary statistics and advisory insights for a selection
    Report(ReportArgs),
    /// Write the filtered listings to a CSV or JSON file
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
    /// Override the configured salary dataset path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Export(args) => run_export(args),
    }
}
