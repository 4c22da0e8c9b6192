use clap::Parser;
use std::process::ExitCode;

use compute_tools::{batch, logging, BatchArgs, ConvertNumbers};

/// Convert numbers to binary, octal and hexadecimal
#[derive(Parser)]
#[command(name = "convert-numbers", version)]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.batch.common.verbose);

    match batch::run_cli(&ConvertNumbers, &cli.batch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
