// 🔢 Number Base Converter - binary, octal, hexadecimal
//
// Integer part: repeated division by the base.
// Fractional part: repeated multiplication by the base, cut off after
// FRACTION_DIGITS digits. The sign is emitted separately.

use crate::batch::{CaseProcessor, CaseReport};
use crate::report;
use anyhow::Result;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Digits for every supported base
pub const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Maximum number of fractional digits produced
pub const FRACTION_DIGITS: usize = 12;

// ============================================================================
// TOKENS
// ============================================================================

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d+$").expect("valid integer regex"))
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").expect("valid float regex")
    })
}

/// A parsed numeric token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i128),
    Fraction(Decimal),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Fraction(d) => write!(f, "{}", d),
        }
    }
}

impl Number {
    /// Parse a single token; None when it is not a supported number
    pub fn parse(token: &str) -> Option<Number> {
        let token = token.trim();

        if integer_pattern().is_match(token) {
            return i128::from_str(token).ok().map(Number::Integer);
        }

        if !float_pattern().is_match(token) {
            return None;
        }

        // Normalize ".5" / "5." so the decimal parser accepts them
        let (negative, body) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token.strip_prefix('+').unwrap_or(token)),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let mut mantissa = mantissa.to_string();
        if mantissa.starts_with('.') {
            mantissa.insert(0, '0');
        }
        if mantissa.ends_with('.') {
            mantissa.push('0');
        }

        let value = match exponent {
            Some(exp) => Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok()?,
            None => Decimal::from_str(&mantissa).ok()?,
        };

        // Decimal silently rounds past 28 fractional digits
        let exponent = match exponent {
            Some(exp) => exp.parse::<i64>().ok()?,
            None => 0,
        };
        if !is_exact(&mantissa, exponent, value) {
            return None;
        }

        Some(Number::Fraction(if negative { -value } else { value }))
    }
}

/// Significant digits and power of ten, without leading or trailing zeros
fn canonical(digits: &str, mut exponent: i64) -> (String, i64) {
    let digits = digits.trim_start_matches('0');
    let significant = digits.trim_end_matches('0');
    if significant.is_empty() {
        return (String::new(), 0);
    }
    exponent += (digits.len() - significant.len()) as i64;
    (significant.to_string(), exponent)
}

/// Whether `value` equals the unsigned token `mantissa` x 10^`exponent`
fn is_exact(mantissa: &str, exponent: i64, value: Decimal) -> bool {
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let token = canonical(
        &format!("{}{}", whole, fraction),
        exponent - fraction.len() as i64,
    );
    let parsed = canonical(
        &value.mantissa().unsigned_abs().to_string(),
        -i64::from(value.scale()),
    );
    token == parsed
}

/// Split text on whitespace; returns valid numbers and the invalid-token count
pub fn parse_tokens(text: &str) -> (Vec<Number>, usize) {
    let mut numbers = Vec::new();
    let mut invalid = 0;

    for token in text.split_whitespace() {
        match Number::parse(token) {
            Some(n) => numbers.push(n),
            None => {
                tracing::warn!("Invalid token ignored: {:?}", token);
                invalid += 1;
            }
        }
    }

    (numbers, invalid)
}

// ============================================================================
// CONVERSION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Octal,
    Hexadecimal,
}

impl Base {
    pub fn radix(&self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Octal => 8,
            Base::Hexadecimal => 16,
        }
    }
}

/// Digits of a non-negative integer (repeated division)
fn magnitude_digits(mut n: u128, base: Base) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let radix = base.radix() as u128;
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % radix) as usize]);
        n /= radix;
    }
    digits.reverse();
    // digits come from DIGITS, always ASCII
    digits.into_iter().map(char::from).collect()
}

/// Integer part of a non-negative decimal
fn whole_part(value: Decimal) -> u128 {
    let whole = value.trunc();
    whole.mantissa().unsigned_abs() / 10u128.pow(whole.scale())
}

/// Digits of a fraction in [0, 1) (repeated multiplication)
fn fraction_digits(mut fraction: Decimal, base: Base) -> String {
    let radix = Decimal::from(base.radix());
    let mut out = String::new();

    while !fraction.is_zero() && out.len() < FRACTION_DIGITS {
        fraction *= radix;
        let digit = fraction.trunc();
        fraction -= digit;
        out.push(char::from(DIGITS[whole_part(digit) as usize]));
    }

    out
}

/// Signed integer in the given base
pub fn integer_to_base(n: i128, base: Base) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{}{}", sign, magnitude_digits(n.unsigned_abs(), base))
}

/// Signed decimal in the given base; fraction omitted when zero
pub fn decimal_to_base(value: Decimal, base: Base) -> String {
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    let magnitude = value.abs();
    let whole = whole_part(magnitude);
    let fraction = fraction_digits(magnitude.fract(), base);

    if fraction.is_empty() {
        format!("{}{}", sign, magnitude_digits(whole, base))
    } else {
        format!("{}{}.{}", sign, magnitude_digits(whole, base), fraction)
    }
}

pub fn number_to_base(number: Number, base: Base) -> String {
    match number {
        Number::Integer(n) => integer_to_base(n, base),
        Number::Fraction(d) => decimal_to_base(d, base),
    }
}

/// One row of the conversion table
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub original: Number,
    pub binary: String,
    pub octal: String,
    pub hexadecimal: String,
}

impl Conversion {
    pub fn new(original: Number) -> Self {
        Conversion {
            original,
            binary: number_to_base(original, Base::Binary),
            octal: number_to_base(original, Base::Octal),
            hexadecimal: number_to_base(original, Base::Hexadecimal),
        }
    }
}

pub fn convert(numbers: &[Number]) -> Vec<Conversion> {
    numbers.iter().copied().map(Conversion::new).collect()
}

// ============================================================================
// BATCH PROCESSOR
// ============================================================================

pub struct ConvertNumbers;

impl CaseProcessor for ConvertNumbers {
    fn title(&self) -> &str {
        "convert-numbers Results"
    }

    fn results_name(&self) -> &str {
        "ConvertionResults"
    }

    fn process(&self, contents: &str) -> Result<CaseReport> {
        let (numbers, invalid) = parse_tokens(contents);
        let rows: Vec<Vec<String>> = convert(&numbers)
            .into_iter()
            .map(|c| vec![c.original.to_string(), c.binary, c.octal, c.hexadecimal])
            .collect();

        let table = report::tsv_table(&["DECIMAL", "BINARY", "OCTAL", "HEXADECIMAL"], &rows)?;

        Ok(CaseReport::new(numbers.len())
            .field("Valid tokens", numbers.len())
            .field("Invalid tokens ignored", invalid)
            .with_body(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_integer_to_base_basic() {
        assert_eq!(integer_to_base(0, Base::Binary), "0");
        assert_eq!(integer_to_base(10, Base::Binary), "1010");
        assert_eq!(integer_to_base(64, Base::Octal), "100");
        assert_eq!(integer_to_base(255, Base::Hexadecimal), "FF");
        assert_eq!(integer_to_base(-26, Base::Hexadecimal), "-1A");
    }

    #[test]
    fn test_integer_round_trip() {
        let samples = [0i128, 1, -1, 7, 8, 255, -4096, 123_456_789, i64::MAX as i128, i128::MIN + 1];
        for n in samples {
            for base in [Base::Binary, Base::Octal, Base::Hexadecimal] {
                let text = integer_to_base(n, base);
                let back = i128::from_str_radix(&text, base.radix()).unwrap();
                assert_eq!(back, n, "round trip of {} in base {}", n, base.radix());
            }
        }
    }

    #[test]
    fn test_i128_min_converts() {
        let text = integer_to_base(i128::MIN, Base::Hexadecimal);
        assert_eq!(text, format!("-8{}", "0".repeat(31)));
    }

    #[test]
    fn test_fraction_terminates() {
        assert_eq!(decimal_to_base(dec!(0.5), Base::Binary), "0.1");
        assert_eq!(decimal_to_base(dec!(10.625), Base::Binary), "1010.101");
        assert_eq!(decimal_to_base(dec!(-2.5), Base::Hexadecimal), "-2.8");
        assert_eq!(decimal_to_base(dec!(3.0), Base::Octal), "3");
    }

    #[test]
    fn test_fraction_cutoff() {
        // 0.1 is periodic in binary
        let text = decimal_to_base(dec!(0.1), Base::Binary);
        assert_eq!(text, "0.000110011001");
        assert_eq!(text.len(), 2 + FRACTION_DIGITS);
    }

    #[test]
    fn test_parse_tokens() {
        let (numbers, invalid) = parse_tokens("12 -7 +3\n1.5 .25 4. 2e3 abc 1.2.3 ABA 0x1F");
        assert_eq!(invalid, 4);
        assert_eq!(numbers[0], Number::Integer(12));
        assert_eq!(numbers[1], Number::Integer(-7));
        assert_eq!(numbers[2], Number::Integer(3));
        assert_eq!(numbers[3], Number::Fraction(dec!(1.5)));
        assert_eq!(numbers[4], Number::Fraction(dec!(0.25)));
        assert_eq!(numbers[5], Number::Fraction(dec!(4)));
        assert_eq!(numbers[6], Number::Fraction(dec!(2000)));
    }

    #[test]
    fn test_inexact_fractions_are_invalid() {
        let tokens = "1.5e-30 1e29 0.0000000000000000000000000000001 1e-28 2.50 -0.000";
        let (numbers, invalid) = parse_tokens(tokens);

        assert_eq!(invalid, 3);
        assert_eq!(
            numbers,
            vec![
                Number::Fraction(dec!(0.0000000000000000000000000001)),
                Number::Fraction(dec!(2.5)),
                Number::Fraction(dec!(0)),
            ]
        );
    }

    #[test]
    fn test_long_fraction_loses_no_digits() {
        // more significant digits than a 96-bit mantissa holds
        assert_eq!(Number::parse("7922816251426433759354395033.55"), None);
        assert_eq!(
            Number::parse("123.4560"),
            Some(Number::Fraction(dec!(123.456)))
        );
    }

    #[test]
    fn test_out_of_range_integer_is_invalid() {
        let (numbers, invalid) = parse_tokens("999999999999999999999999999999999999999999");
        assert!(numbers.is_empty());
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_conversion_row() {
        let row = Conversion::new(Number::Integer(100));
        assert_eq!(row.binary, "1100100");
        assert_eq!(row.octal, "144");
        assert_eq!(row.hexadecimal, "64");
    }

    #[test]
    fn test_process_empty_input() {
        let report = ConvertNumbers.process("").unwrap();
        assert_eq!(report.records, 0);
        assert_eq!(report.body.as_deref(), Some("DECIMAL\tBINARY\tOCTAL\tHEXADECIMAL\n"));
    }
}
