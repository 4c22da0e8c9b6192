// 🧭 CLI - shared argument groups
//
// Each binary defines its own `Parser` and flattens these in.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Options every tool accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory where result reports are written
    #[arg(long, env = "RESULTS_DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments of the batch-capable tools (convert-numbers, compute-statistics, word-count)
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Input file, or a directory when --all is given
    pub path: PathBuf,

    /// Process every matching file in the directory
    #[arg(long)]
    pub all: bool,

    /// File name pattern used with --all
    #[arg(long, default_value = "*.txt")]
    pub pattern: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Report output format for compute-sales
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text report only
    #[default]
    Text,
    /// Plain text plus a JSON copy of the report
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        batch: BatchArgs,
    }

    #[test]
    fn test_batch_args_defaults() {
        let cli = TestCli::try_parse_from(["tool", "data/TC1.txt"]).unwrap();
        assert_eq!(cli.batch.path, PathBuf::from("data/TC1.txt"));
        assert!(!cli.batch.all);
        assert_eq!(cli.batch.pattern, "*.txt");
        assert_eq!(cli.batch.common.verbose, 0);
    }

    #[test]
    fn test_batch_args_all_and_verbose() {
        let cli = TestCli::try_parse_from(["tool", "data", "--all", "-vv", "--pattern", "TC*.txt"]).unwrap();
        assert!(cli.batch.all);
        assert_eq!(cli.batch.pattern, "TC*.txt");
        assert_eq!(cli.batch.common.verbose, 2);
    }

    #[test]
    fn test_batch_args_missing_path() {
        assert!(TestCli::try_parse_from(["tool"]).is_err());
    }
}
