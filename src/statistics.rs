// 📊 Descriptive Statistics - mean, median, mode, variance, std deviation
//
// Variance is the population variance (divide by n).

use crate::batch::{CaseProcessor, CaseReport};
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?$").expect("valid number regex")
    })
}

/// Extract numbers from whitespace-separated text; returns (numbers, invalid count)
pub fn extract_numbers(text: &str) -> (Vec<f64>, usize) {
    let mut numbers = Vec::new();
    let mut invalid = 0;

    for token in text.split_whitespace() {
        let parsed = if number_pattern().is_match(token) {
            token.parse::<f64>().ok().filter(|v| v.is_finite())
        } else {
            None
        };

        match parsed {
            Some(v) => numbers.push(v),
            None => {
                tracing::warn!("Invalid token ignored: {:?}", token);
                invalid += 1;
            }
        }
    }

    (numbers, invalid)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// First-seen value among those with the highest frequency
    pub mode: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl Summary {
    /// None for an empty input
    pub fn compute(numbers: &[f64]) -> Option<Summary> {
        if numbers.is_empty() {
            return None;
        }

        let count = numbers.len();
        let n = count as f64;
        let mean = numbers.iter().sum::<f64>() / n;

        let mut sorted = numbers.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };

        let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        Some(Summary {
            count,
            mean,
            median,
            mode: mode(numbers),
            variance,
            std_dev: variance.sqrt(),
        })
    }

    pub fn mode_text(&self) -> String {
        format_number(self.mode)
    }
}

fn mode(numbers: &[f64]) -> f64 {
    let mut order: Vec<u64> = Vec::new();
    let mut counts: HashMap<u64, usize> = HashMap::new();

    for value in numbers {
        // -0.0 and 0.0 count as the same value
        let key = (value + 0.0).to_bits();
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    order
        .into_iter()
        .find(|k| counts.get(k) == Some(&max))
        .map(f64::from_bits)
        // only reached for empty input, which compute() rules out
        .unwrap_or(f64::NAN)
}

/// Whole floats keep one decimal ("3.0"), others print as-is
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub struct ComputeStatistics;

impl CaseProcessor for ComputeStatistics {
    fn title(&self) -> &str {
        "compute-statistics Results"
    }

    fn results_name(&self) -> &str {
        "StatisticsResults"
    }

    fn process(&self, contents: &str) -> Result<CaseReport> {
        let (numbers, invalid) = extract_numbers(contents);
        let report = CaseReport::new(numbers.len())
            .field("Valid count", numbers.len())
            .field("Invalid tokens ignored", invalid);

        let report = match Summary::compute(&numbers) {
            Some(s) => report
                .field("Mean", format_number(s.mean))
                .field("Median", format_number(s.median))
                .field("Mode", s.mode_text())
                .field("Variance (population)", format_number(s.variance))
                .field("Standard deviation", format_number(s.std_dev)),
            None => {
                tracing::warn!("No valid numeric values found");
                ["Mean", "Median", "Mode", "Variance (population)", "Standard deviation"]
                    .iter()
                    .fold(report, |r, label| r.field(label, "N/A"))
            }
        };

        Ok(report)
    }
}
