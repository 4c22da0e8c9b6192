// 🔤 Word Count - distinct words and their frequencies

use crate::batch::{CaseProcessor, CaseReport};
use crate::report;
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-zÁÉÍÓÚÜÑáéíóúüñ0-9']+").expect("valid word regex"))
}

/// Words in order of appearance, lower-cased
pub fn normalize_words(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordFrequencies {
    pub total_words: usize,
    /// Sorted by count descending, then word ascending
    pub frequencies: Vec<(String, usize)>,
}

impl WordFrequencies {
    pub fn count(text: &str) -> Self {
        let words = normalize_words(text);
        let total_words = words.len();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in words {
            *counts.entry(word).or_insert(0) += 1;
        }

        let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        WordFrequencies {
            total_words,
            frequencies,
        }
    }

    pub fn distinct_words(&self) -> usize {
        self.frequencies.len()
    }
}

pub struct WordCount;

impl CaseProcessor for WordCount {
    fn title(&self) -> &str {
        "word-count Results"
    }

    fn results_name(&self) -> &str {
        "WordCountResults"
    }

    fn process(&self, contents: &str) -> Result<CaseReport> {
        let result = WordFrequencies::count(contents);
        let rows: Vec<Vec<String>> = result
            .frequencies
            .iter()
            .map(|(word, count)| vec![word.clone(), count.to_string()])
            .collect();
        let table = report::tsv_table(&["WORD", "COUNT"], &rows)?;

        Ok(CaseReport::new(result.total_words)
            .field("Total words", result.total_words)
            .field("Distinct words", result.distinct_words())
            .with_body(table))
    }
}
