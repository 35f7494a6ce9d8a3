//! api-regress
//!
//! Posts every use case to the reference server and to the version under
//! test, compares the answers and records them in the results file.
//!
//! Exit status: 0 once every use case has been processed (differences
//! included), 1 when setup fails, 2 with `--fail-on-diff` when any use case
//! differed or failed.

mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use regress_compare::{run_regression, RunSummary};
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_FATAL: u8 = 1;
const EXIT_FAILURES: u8 = 2;

async fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let _log_guard = logging::init(&cli.log_file)?;

    info!("Starting api-regress");
    match run_regression(&cli.paths()).await {
        Ok(summary) => Ok(summary),
        Err(e) => {
            error!("Erreur générale : {}", e);
            Err(e.into())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(summary) if cli.fail_on_diff && summary.failures() > 0 => {
            ExitCode::from(EXIT_FAILURES)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Erreur générale : {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
