// 📦 Batch Runner - one input file or every file in a directory
//
// Shared by convert-numbers, compute-statistics and word-count. Each tool
// only implements `CaseProcessor`; reading, timing, report layout and the
// batch summary live here.

use crate::cli::BatchArgs;
use crate::error::InputError;
use crate::report::{self, content_digest, format_elapsed};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const SUMMARY_FILENAME: &str = "batch_summary.txt";

// ============================================================================
// CORE TYPES
// ============================================================================

/// What a processor produced for one input
#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    /// Records processed (numbers, words, ...)
    pub records: usize,
    /// `Label: value` header lines
    pub fields: Vec<(String, String)>,
    /// Free-form section after the header (usually a table)
    pub body: Option<String>,
}

impl CaseReport {
    pub fn new(records: usize) -> Self {
        CaseReport {
            records,
            fields: Vec::new(),
            body: None,
        }
    }

    /// Builder pattern: add a header field
    pub fn field(mut self, label: &str, value: impl Display) -> Self {
        self.fields.push((label.to_string(), value.to_string()));
        self
    }

    /// Builder pattern: set the body section
    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// CaseProcessor - the only thing a batch-capable tool implements
pub trait CaseProcessor {
    /// First line of every report
    fn title(&self) -> &str;

    /// Results file base name: `<name>.txt` or `<name>_<stem>.txt`
    fn results_name(&self) -> &str;

    /// Analyze the full contents of one input file
    fn process(&self, contents: &str) -> Result<CaseReport>;
}

/// Result of one processed file
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub input: PathBuf,
    pub report_path: PathBuf,
    pub records: usize,
}

/// One line of batch_summary.txt
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub outcome: std::result::Result<CaseOutcome, String>,
}

impl BatchEntry {
    pub fn summary_line(&self) -> String {
        let name = file_name(&self.input);
        match &self.outcome {
            Ok(outcome) => format!("{}: OK -> {}", name, file_name(&outcome.report_path)),
            Err(reason) => format!("{}: ERROR -> {}", name, reason),
        }
    }
}

#[derive(Debug)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
    pub summary_path: PathBuf,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// RUNNERS
// ============================================================================

/// Read, process and render one input; returns the report text
pub fn render_case<P: CaseProcessor + ?Sized>(processor: &P, input: &Path) -> Result<(String, usize)> {
    let start = Instant::now();
    let contents = report::read_input(input)?;
    let case = processor
        .process(&contents)
        .with_context(|| format!("Failed to process {}", input.display()))?;
    let elapsed = start.elapsed();

    let mut out = Vec::new();
    out.push(processor.title().to_string());
    out.push(format!("Input file: {}", input.display()));
    out.push(format!("Input SHA-256: {}", content_digest(&contents)));
    out.push(format!("Generated at: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
    for (label, value) in &case.fields {
        out.push(format!("{}: {}", label, value));
    }
    out.push(format!("Elapsed time (seconds): {}", format_elapsed(elapsed)));

    let mut text = out.join("\n");
    text.push('\n');
    if let Some(body) = &case.body {
        text.push('\n');
        text.push_str(body);
    }

    Ok((text, case.records))
}

fn process_case<P: CaseProcessor + ?Sized>(processor: &P, input: &Path, report_path: PathBuf) -> Result<CaseOutcome> {
    let (text, records) = render_case(processor, input)?;
    report::write_report(&report_path, &text)?;
    Ok(CaseOutcome {
        input: input.to_path_buf(),
        report_path,
        records,
    })
}

/// Single mode: `<results_dir>/<results_name>.txt`
pub fn run_single<P: CaseProcessor + ?Sized>(processor: &P, input: &Path, results_dir: &Path) -> Result<CaseOutcome> {
    if !input.is_file() {
        return Err(InputError::NotFound(input.to_path_buf()).into());
    }

    let report_path = report::results_path(results_dir, &format!("{}.txt", processor.results_name()));
    process_case(processor, input, report_path)
}

/// Files in `dir` matching `pattern`, sorted
pub fn discover_cases(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, InputError> {
    let full = format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), pattern);
    let paths = glob::glob(&full).map_err(|source| InputError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(InputError::NoCaseFiles {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    Ok(files)
}

/// Batch mode: one report per file plus batch_summary.txt
///
/// A failing file is recorded in the summary and the batch continues.
pub fn run_all<P: CaseProcessor + ?Sized>(
    processor: &P,
    data_dir: &Path,
    pattern: &str,
    results_dir: &Path,
) -> Result<BatchSummary> {
    let files = discover_cases(data_dir, pattern)?;
    tracing::info!("Batch: {} files in {}", files.len(), data_dir.display());

    let mut entries = Vec::with_capacity(files.len());
    for input in files {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let report_path =
            report::results_path(results_dir, &format!("{}_{}.txt", processor.results_name(), stem));

        let outcome = process_case(processor, &input, report_path).map_err(|e| {
            tracing::error!("{}: {:#}", input.display(), e);
            format!("{:#}", e)
        });
        entries.push(BatchEntry { input, outcome });
    }

    let mut summary = format!("Batch summary for {}\n\n", processor.title());
    for entry in &entries {
        summary.push_str(&entry.summary_line());
        summary.push('\n');
    }

    let summary_path = report::results_path(results_dir, SUMMARY_FILENAME);
    report::write_report(&summary_path, &summary)?;

    Ok(BatchSummary {
        entries,
        summary_path,
    })
}

/// Entry point used by the batch-capable binaries
pub fn run_cli<P: CaseProcessor + ?Sized>(processor: &P, args: &BatchArgs) -> Result<()> {
    let results_dir = &args.common.results_dir;

    if args.all {
        let summary = run_all(processor, &args.path, &args.pattern, results_dir)?;
        println!(
            "[OK] Batch results written to: {} ({} ok, {} failed)",
            results_dir.display(),
            summary.succeeded(),
            summary.failed()
        );
        println!("[OK] Summary: {}", summary.summary_path.display());
    } else {
        let outcome = run_single(processor, &args.path, results_dir)?;
        println!(
            "[OK] Results written to: {} ({} records)",
            outcome.report_path.display(),
            outcome.records
        );
    }

    Ok(())
}
