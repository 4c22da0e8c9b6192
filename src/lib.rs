// Compute Tools - Core Library
// Exposes all modules for use by the CLI binaries and tests

pub mod error;
pub mod logging;
pub mod cli;
pub mod report;
pub mod catalog;
pub mod sales;
pub mod totals;
pub mod batch;
pub mod convert;      // Base conversion (binary / octal / hex)
pub mod statistics;   // Mean, median, mode, variance
pub mod word_count;

// Re-export commonly used types
pub use error::{InputError, InputResult, Issue, IssueKind};
pub use cli::{BatchArgs, CommonArgs, ReportFormat};
pub use catalog::Catalog;
pub use sales::{normalize_sales, Sale, SaleLine};
pub use totals::{SalesConfig, SalesReport, SalesRun};
pub use batch::{run_all, run_single, BatchSummary, CaseProcessor, CaseReport};
pub use convert::{Base, Conversion, ConvertNumbers, Number};
pub use statistics::{ComputeStatistics, Summary};
pub use word_count::{WordCount, WordFrequencies};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
