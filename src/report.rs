// 📝 Report helpers - reading inputs, writing results, formatting
//
// Every tool reads its whole input once and writes one plain-text report.

use crate::error::{InputError, InputResult};
use rust_decimal::{Decimal, RoundingStrategy};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section separator used in text reports
pub const RULE: &str = "============================================================";
pub const THIN_RULE: &str = "------------------------------------------------------------";

/// Read a UTF-8 input file
pub fn read_input(path: &Path) -> InputResult<String> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 of the input contents, hex encoded (provenance line in reports)
pub fn content_digest(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write a report, creating the results directory if needed
pub fn write_report(path: &Path, contents: &str) -> InputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| InputError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| InputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}

/// `results/<name>`
pub fn results_path(results_dir: &Path, file_name: &str) -> PathBuf {
    results_dir.join(file_name)
}

/// Seconds with microsecond precision: "0.000123"
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// Money as "$12.30", rounded half-to-even
pub fn money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("${:.2}", rounded)
}

/// Render a tab-separated table (header + rows) with the csv writer
pub fn tsv_table(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_money_rounds_half_even() {
        assert_eq!(money(dec!(2.345)), "$2.34");
        assert_eq!(money(dec!(2.355)), "$2.36");
        assert_eq!(money(dec!(10)), "$10.00");
        assert_eq!(money(dec!(0)), "$0.00");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_micros(1500)), "0.001500");
    }

    #[test]
    fn test_content_digest_is_stable() {
        let a = content_digest("1 2 3");
        assert_eq!(a.len(), 64);
        assert_eq!(a, content_digest("1 2 3"));
        assert_ne!(a, content_digest("1 2 4"));
    }

    #[test]
    fn test_read_input_missing() {
        let err = read_input(Path::new("definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }

    #[test]
    fn test_write_report_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("out.txt");
        write_report(&path, "hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_tsv_table() {
        let table = tsv_table(
            &["WORD", "COUNT"],
            &[vec!["hola".to_string(), "2".to_string()]],
        )
        .unwrap();
        assert_eq!(table, "WORD\tCOUNT\nhola\t2\n");
    }
}
