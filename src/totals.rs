// 🧮 Sales Totals - price × quantity per line, per sale, grand total
//
// Formula:
//   grand_total = Σ catalog[line.product] × line.quantity
//                 over every line whose product exists in the catalog
//
// Unknown products are skipped, counted and listed; they never abort the run.

use crate::catalog::Catalog;
use crate::cli::ReportFormat;
use crate::error::{count_kind, InputError, InputResult, Issue, IssueKind};
use crate::report::{self, money, RULE, THIN_RULE};
use crate::sales::{normalize_sales, Sale, SaleLine};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const RESULTS_SUFFIX: &str = "_SalesResults";

// ============================================================================
// REPORT TYPES
// ============================================================================

/// A line that matched the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub product: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleTotal {
    /// 1-based position in the sales record
    pub number: usize,
    pub sale_id: Option<String>,
    pub lines: Vec<PricedLine>,
    /// Lines in the sale before catalog lookup
    pub line_count: usize,
    pub total: Decimal,
}

impl SaleTotal {
    pub fn valid_lines(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub generated_at: DateTime<Utc>,
    pub catalog_items: usize,
    pub sales: Vec<SaleTotal>,
    pub grand_total: Decimal,
    pub issues: Vec<Issue>,
    pub elapsed_seconds: f64,
}

impl SalesReport {
    /// Price every sale against the catalog
    ///
    /// `issues` carries problems found while loading; unknown products found
    /// here are appended after them.
    pub fn compute(catalog: &Catalog, sales: &[Sale], issues: Vec<Issue>) -> Self {
        let mut issues = issues;
        let mut totals = Vec::with_capacity(sales.len());
        let mut grand_total = Decimal::ZERO;

        for (idx, sale) in sales.iter().enumerate() {
            let number = idx + 1;
            let mut lines = Vec::new();
            let mut sale_total = Decimal::ZERO;

            for SaleLine { product, quantity } in &sale.lines {
                let unit_price = match catalog.price(product) {
                    Some(price) => price,
                    None => {
                        issues.push(Issue::new(
                            IssueKind::UnknownProduct,
                            format!("[ERROR] Unknown product '{}' in Sale #{}.", product, number),
                        ));
                        continue;
                    }
                };

                // The line is kept only if it fits in the sale and grand totals
                let totals_after = unit_price.checked_mul(*quantity).and_then(|line_total| {
                    let sale = sale_total.checked_add(line_total)?;
                    grand_total.checked_add(sale).map(|_| (line_total, sale))
                });
                let (line_total, new_sale_total) = match totals_after {
                    Some(t) => t,
                    None => {
                        issues.push(Issue::new(
                            IssueKind::Overflow,
                            format!(
                                "[ERROR] Amount for '{}' x {} in Sale #{} is too large.",
                                product, quantity, number
                            ),
                        ));
                        continue;
                    }
                };

                sale_total = new_sale_total;
                lines.push(PricedLine {
                    product: product.clone(),
                    quantity: *quantity,
                    unit_price,
                    line_total,
                });
            }

            // checked above for every line
            grand_total += sale_total;
            totals.push(SaleTotal {
                number,
                sale_id: sale.id.clone(),
                lines,
                line_count: sale.lines.len(),
                total: sale_total,
            });
        }

        SalesReport {
            generated_at: Utc::now(),
            catalog_items: catalog.len(),
            sales: totals,
            grand_total,
            issues,
            elapsed_seconds: 0.0,
        }
    }

    pub fn with_elapsed(mut self, elapsed_seconds: f64) -> Self {
        self.elapsed_seconds = elapsed_seconds;
        self
    }

    pub fn unknown_products(&self) -> usize {
        count_kind(&self.issues, IssueKind::UnknownProduct)
    }

    /// Every skipped record (load failures excluded)
    pub fn skipped_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.kind != IssueKind::LoadFailure)
            .count()
    }

    pub fn processed_lines(&self) -> usize {
        self.sales.iter().map(SaleTotal::valid_lines).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} sales, {} lines priced, {} skipped, grand total {}",
            self.sales.len(),
            self.processed_lines(),
            self.skipped_count(),
            money(self.grand_total)
        )
    }

    /// Plain-text report body (everything up to and including the grand total)
    pub fn render_body(&self) -> Vec<String> {
        let mut out = Vec::new();

        out.push("SALES REPORT".to_string());
        out.push(RULE.to_string());
        out.push(format!("Generated at: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
        out.push(format!("Catalogue items loaded: {}", self.catalog_items));
        out.push(format!("Sales loaded: {}", self.sales.len()));
        out.push(String::new());

        for sale in &self.sales {
            match &sale.sale_id {
                Some(id) => out.push(format!("Sale #{} (SALE_ID {})", sale.number, id)),
                None => out.push(format!("Sale #{}", sale.number)),
            }
            out.push(THIN_RULE.to_string());

            for line in &sale.lines {
                out.push(format!(
                    "  - {} | qty={} | unit={} | line={}",
                    line.product,
                    line.quantity,
                    money(line.unit_price),
                    money(line.line_total)
                ));
            }

            out.push(format!("  Valid lines: {}/{}", sale.valid_lines(), sale.line_count));
            out.push(format!("  Sale total: {}", money(sale.total)));
            out.push(String::new());
        }

        out.push(RULE.to_string());
        out.push(format!("GRAND TOTAL: {}", money(self.grand_total)));
        out
    }

    /// Full text report as written to the results file
    pub fn render_text(&self) -> String {
        let mut out = self.render_body();

        out.push(String::new());
        out.push("SKIPPED ITEMS".to_string());
        out.push(THIN_RULE.to_string());
        for kind in [
            IssueKind::UnknownProduct,
            IssueKind::MalformedCatalogEntry,
            IssueKind::MalformedSaleLine,
            IssueKind::Overflow,
            IssueKind::LoadFailure,
        ] {
            out.push(format!("  {}: {}", kind.label(), count_kind(&self.issues, kind)));
        }
        out.push(format!("  Total skipped: {}", self.skipped_count()));

        out.push(String::new());
        out.push(format!("Elapsed time: {:.6} seconds", self.elapsed_seconds));

        if !self.issues.is_empty() {
            out.push(String::new());
            out.push("ERRORS (execution continued):".to_string());
            out.push(THIN_RULE.to_string());
            out.extend(self.issues.iter().map(|i| i.message.clone()));
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Everything needed for one compute-sales invocation
#[derive(Debug, Clone)]
pub struct SalesConfig {
    pub catalog_path: PathBuf,
    pub sales_path: PathBuf,
    pub results_dir: PathBuf,
    pub format: ReportFormat,
}

/// What a run produced
#[derive(Debug)]
pub struct SalesRun {
    pub report: SalesReport,
    pub text_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

impl SalesRun {
    /// True when the catalog or sales file could not be loaded
    pub fn load_failed(&self) -> bool {
        count_kind(&self.report.issues, IssueKind::LoadFailure) > 0
    }
}

/// Read and parse a JSON input file
pub fn load_json(path: &Path) -> InputResult<Value> {
    let text = report::read_input(path)?;
    serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON file, turning failure into a LoadFailure issue
fn load_or_record(path: &Path, issues: &mut Vec<Issue>) -> Option<Value> {
    match load_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            issues.push(Issue::new(IssueKind::LoadFailure, format!("[ERROR] {}", e)));
            None
        }
    }
}

/// `<case>_SalesResults` where case is the sales file's folder (TC1, TC2, ...)
pub fn results_stem(sales_path: &Path) -> String {
    let case = sales_path
        .parent()
        .and_then(|p| p.file_name())
        .or_else(|| sales_path.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", case, RESULTS_SUFFIX)
}

/// Load both files, compute totals, write the report(s)
pub fn run(config: &SalesConfig) -> Result<SalesRun> {
    let start = Instant::now();
    let mut issues = Vec::new();

    let raw_catalog = load_or_record(&config.catalog_path, &mut issues);
    let raw_sales = load_or_record(&config.sales_path, &mut issues);

    let catalog = match &raw_catalog {
        Some(raw) => {
            let (catalog, catalog_issues) = Catalog::from_json(raw);
            issues.extend(catalog_issues);
            catalog
        }
        None => Catalog::new(),
    };

    let sales = match &raw_sales {
        Some(raw) => {
            let (sales, sale_issues) = normalize_sales(raw);
            issues.extend(sale_issues);
            sales
        }
        None => Vec::new(),
    };

    let report = SalesReport::compute(&catalog, &sales, issues)
        .with_elapsed(start.elapsed().as_secs_f64());

    let stem = results_stem(&config.sales_path);
    let text_path = report::results_path(&config.results_dir, &format!("{}.txt", stem));
    report::write_report(&text_path, &report.render_text())?;

    let json_path = match config.format {
        ReportFormat::Json => {
            let path = report::results_path(&config.results_dir, &format!("{}.json", stem));
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize sales report")?;
            report::write_report(&path, &json)?;
            Some(path)
        }
        ReportFormat::Text => None,
    };

    tracing::info!("{}", report.summary());

    Ok(SalesRun {
        report,
        text_path,
        json_path,
    })
}
