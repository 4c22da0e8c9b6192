use clap::Parser;
use std::process::ExitCode;

use compute_tools::{batch, logging, BatchArgs, WordCount};

/// Count distinct words and their frequencies
#[derive(Parser)]
#[command(name = "word-count", version)]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.batch.common.verbose);

    match batch::run_cli(&WordCount, &cli.batch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
