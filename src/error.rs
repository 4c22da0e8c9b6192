// ⚠️ Input Errors - fatal failures that stop a run
//
// Non-fatal problems (bad records, unknown products, bad tokens) are NOT
// errors: they are collected as `Issue`s and end up in the report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no files matching '{pattern}' found in: {dir}")]
    NoCaseFiles { dir: PathBuf, pattern: String },

    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot write results file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type InputResult<T> = std::result::Result<T, InputError>;

// ============================================================================
// ISSUES (non-fatal)
// ============================================================================

/// What kind of record was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum IssueKind {
    /// Catalog entry without a usable name or price
    MalformedCatalogEntry,
    /// Sale line without product name or with a bad quantity
    MalformedSaleLine,
    /// Sale line referencing a product missing from the catalog
    UnknownProduct,
    /// Input file could not be loaded at all
    LoadFailure,
    /// Line whose amount does not fit in a decimal
    Overflow,
}

impl IssueKind {
    pub fn label(&self) -> &str {
        match self {
            IssueKind::MalformedCatalogEntry => "malformed catalog entries",
            IssueKind::MalformedSaleLine => "malformed sale lines",
            IssueKind::UnknownProduct => "unknown products",
            IssueKind::LoadFailure => "input load failures",
            IssueKind::Overflow => "amount overflows",
        }
    }

    /// Load failures are errors; skipped records are warnings
    pub fn log_level(&self) -> tracing::Level {
        match self {
            IssueKind::LoadFailure => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        }
    }
}

/// A skipped record and why
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        let message = message.into();
        if kind.log_level() == tracing::Level::ERROR {
            tracing::error!("{}", message);
        } else {
            tracing::warn!("{}", message);
        }
        Issue { kind, message }
    }
}

/// Count issues of one kind
pub fn count_kind(issues: &[Issue], kind: IssueKind) -> usize {
    issues.iter().filter(|i| i.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = InputError::NotFound(PathBuf::from("data/TC9.txt"));
        assert_eq!(err.to_string(), "input file not found: data/TC9.txt");
    }

    #[test]
    fn test_count_kind() {
        let issues = vec![
            Issue::new(IssueKind::UnknownProduct, "a"),
            Issue::new(IssueKind::MalformedSaleLine, "b"),
            Issue::new(IssueKind::UnknownProduct, "c"),
        ];
        assert_eq!(count_kind(&issues, IssueKind::UnknownProduct), 2);
        assert_eq!(count_kind(&issues, IssueKind::MalformedCatalogEntry), 0);
    }

    #[test]
    fn test_log_level_by_kind() {
        assert_eq!(IssueKind::LoadFailure.log_level(), tracing::Level::ERROR);
        assert_eq!(IssueKind::UnknownProduct.log_level(), tracing::Level::WARN);
        assert_eq!(IssueKind::Overflow.log_level(), tracing::Level::WARN);
    }
}
