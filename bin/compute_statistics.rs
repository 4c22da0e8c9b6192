use clap::Parser;
use std::process::ExitCode;

use compute_tools::{batch, logging, BatchArgs, ComputeStatistics};

/// Compute mean, median, mode, variance and standard deviation
#[derive(Parser)]
#[command(name = "compute-statistics", version)]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.batch.common.verbose);

    match batch::run_cli(&ComputeStatistics, &cli.batch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
