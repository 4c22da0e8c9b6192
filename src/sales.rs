// 🧾 Sales Record - normalized sale lines
//
// A sales file is either a flat list of line items (optionally tagged with
// SALE_ID), a list of sale objects, or a container object holding either.
// Malformed lines are skipped and recorded as issues.

use crate::catalog::{first_field, to_decimal};
use crate::error::{Issue, IssueKind};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Keys that may hold the product name of a sale line
pub const PRODUCT_KEYS: &[&str] = &["product", "title", "name", "Product"];

/// Keys that may hold the quantity
pub const QUANTITY_KEYS: &[&str] = &["quantity", "qty", "Quantity"];

/// Key grouping flat line items into sales
pub const SALE_ID_KEY: &str = "SALE_ID";

const LINE_CONTAINER_KEYS: &[&str] = &["items", "products", "lines"];
const SALES_CONTAINER_KEYS: &[&str] = &["sales", "record", "data"];

// ============================================================================
// CORE TYPES
// ============================================================================

/// SaleLine - product name + quantity sold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleLine {
    pub product: String,
    pub quantity: Decimal,
}

impl SaleLine {
    pub fn new(product: impl Into<String>, quantity: Decimal) -> Self {
        SaleLine {
            product: product.into(),
            quantity,
        }
    }
}

/// Sale - ordered group of lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    /// SALE_ID when the input provides one
    pub id: Option<String>,
    pub lines: Vec<SaleLine>,
}

impl Sale {
    pub fn new(lines: Vec<SaleLine>) -> Self {
        Sale { id: None, lines }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize any supported sales JSON root
pub fn normalize_sales(raw: &Value) -> (Vec<Sale>, Vec<Issue>) {
    let mut issues = Vec::new();
    let sales = normalize_root(raw, &mut issues);
    tracing::debug!("Sales normalized: {} sales, {} skipped", sales.len(), issues.len());
    (sales, issues)
}

fn normalize_root(raw: &Value, issues: &mut Vec<Issue>) -> Vec<Sale> {
    match raw {
        Value::Object(obj) => {
            if let Some(list) = SALES_CONTAINER_KEYS
                .iter()
                .find_map(|k| obj.get(*k).filter(|v| v.is_array()))
            {
                return normalize_root(list, issues);
            }

            // Single sale object
            let lines = extract_lines(raw, "single sale object", issues);
            if lines.is_empty() {
                issues.push(Issue::new(
                    IssueKind::MalformedSaleLine,
                    "[ERROR] No valid sale lines found in sales object.",
                ));
                return Vec::new();
            }
            vec![Sale::new(lines)]
        }
        Value::Array(items) => {
            if looks_like_line_list(items) {
                return group_flat_lines(items, issues);
            }

            let mut sales = Vec::new();
            for (idx, sale_obj) in items.iter().enumerate() {
                let ctx = format!("sale #{}", idx + 1);
                let lines = extract_lines(sale_obj, &ctx, issues);
                if lines.is_empty() {
                    issues.push(Issue::new(
                        IssueKind::MalformedSaleLine,
                        format!("[ERROR] Sale #{} has no valid lines; skipped.", idx + 1),
                    ));
                    continue;
                }
                sales.push(Sale::new(lines));
            }
            sales
        }
        _ => {
            issues.push(Issue::new(
                IssueKind::MalformedSaleLine,
                "[ERROR] Unrecognized sales JSON structure (not list/object).",
            ));
            Vec::new()
        }
    }
}

/// A list is a flat line list when at least half of it (and at least one
/// element) carries both a product and a quantity key.
fn looks_like_line_list(items: &[Value]) -> bool {
    if items.is_empty() || !items.iter().all(Value::is_object) {
        return false;
    }

    let line_like = items
        .iter()
        .filter_map(Value::as_object)
        .filter(|obj| has_any(obj, PRODUCT_KEYS) && has_any(obj, QUANTITY_KEYS))
        .count();

    line_like >= std::cmp::max(1, items.len() / 2)
}

fn has_any(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| obj.contains_key(*k))
}

/// Group flat line items by SALE_ID, preserving first-seen order
fn group_flat_lines(items: &[Value], issues: &mut Vec<Issue>) -> Vec<Sale> {
    let mut order: Vec<Option<String>> = Vec::new();
    let mut groups: HashMap<Option<String>, Vec<SaleLine>> = HashMap::new();

    for (idx, item) in items.iter().enumerate() {
        let ctx = format!("sale list line #{}", idx + 1);
        let line = match parse_line(item, &ctx) {
            Ok(line) => line,
            Err(issue) => {
                issues.push(issue);
                continue;
            }
        };

        let sale_id = item.get(SALE_ID_KEY).and_then(sale_id_text);
        if !groups.contains_key(&sale_id) {
            order.push(sale_id.clone());
        }
        groups.entry(sale_id).or_default().push(line);
    }

    order
        .into_iter()
        .filter_map(|id| {
            let lines = groups.remove(&id)?;
            let sale = Sale::new(lines);
            Some(match id {
                Some(id) => sale.with_id(id),
                None => sale,
            })
        })
        .collect()
}

fn sale_id_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract lines from a sale-like value (list of lines, container, or single line)
fn extract_lines(value: &Value, ctx: &str, issues: &mut Vec<Issue>) -> Vec<SaleLine> {
    let mut lines = Vec::new();

    match value {
        Value::Array(items) => collect_lines(items, ctx, &mut lines, issues),
        Value::Object(obj) => {
            if let Some((key, items)) = LINE_CONTAINER_KEYS
                .iter()
                .find_map(|k| obj.get(*k).and_then(|v| v.as_array()).map(|a| (*k, a)))
            {
                collect_lines(items, &format!("{} '{}'", ctx, key), &mut lines, issues);
            } else if has_any(obj, PRODUCT_KEYS) {
                match parse_line(value, ctx) {
                    Ok(line) => lines.push(line),
                    Err(issue) => issues.push(issue),
                }
            } else {
                issues.push(Issue::new(
                    IssueKind::MalformedSaleLine,
                    format!("[ERROR] Unrecognized sale object structure in {}.", ctx),
                ));
            }
        }
        _ => issues.push(Issue::new(
            IssueKind::MalformedSaleLine,
            format!("[ERROR] Unrecognized sale structure in {} (not list/object).", ctx),
        )),
    }

    lines
}

fn collect_lines(items: &[Value], ctx: &str, lines: &mut Vec<SaleLine>, issues: &mut Vec<Issue>) {
    for (i, item) in items.iter().enumerate() {
        match parse_line(item, &format!("{} line #{}", ctx, i + 1)) {
            Ok(line) => lines.push(line),
            Err(issue) => issues.push(issue),
        }
    }
}

/// Parse one sale line; product must be a non-empty string, quantity > 0
fn parse_line(value: &Value, ctx: &str) -> Result<SaleLine, Issue> {
    let obj = value.as_object().ok_or_else(|| {
        Issue::new(
            IssueKind::MalformedSaleLine,
            format!("[ERROR] Invalid sale line in {}: {}", ctx, value),
        )
    })?;

    let product = first_field(obj, PRODUCT_KEYS)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Issue::new(
                IssueKind::MalformedSaleLine,
                format!("[ERROR] Missing product name in {}.", ctx),
            )
        })?;

    let raw_qty = first_field(obj, QUANTITY_KEYS);
    let quantity = raw_qty.and_then(to_decimal).ok_or_else(|| {
        Issue::new(
            IssueKind::MalformedSaleLine,
            format!(
                "[ERROR] Invalid number for quantity for '{}' in {}: {}",
                product,
                ctx,
                raw_qty.map(|v| v.to_string()).unwrap_or_else(|| "missing".to_string())
            ),
        )
    })?;

    if quantity <= Decimal::ZERO {
        return Err(Issue::new(
            IssueKind::MalformedSaleLine,
            format!("[ERROR] Non-positive quantity for '{}' in {}: {}", product, ctx, quantity),
        ));
    }

    Ok(SaleLine::new(product, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_flat_lines_grouped_by_sale_id() {
        let raw = json!([
            {"SALE_ID": 1, "SALE_Date": "12/01/23", "Product": "Rustic breakfast", "Quantity": 1},
            {"SALE_ID": 1, "SALE_Date": "12/01/23", "Product": "Sandwich with salad", "Quantity": 2},
            {"SALE_ID": 2, "SALE_Date": "12/01/23", "Product": "Rustic breakfast", "Quantity": 3}
        ]);
        let (sales, issues) = normalize_sales(&raw);

        assert!(issues.is_empty());
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id.as_deref(), Some("1"));
        assert_eq!(sales[0].lines.len(), 2);
        assert_eq!(sales[1].lines[0], SaleLine::new("Rustic breakfast", dec!(3)));
    }

    #[test]
    fn test_flat_lines_without_sale_id_are_one_sale() {
        let raw = json!([
            {"product": "Pen", "qty": 2},
            {"product": "Paper", "qty": "1.5"}
        ]);
        let (sales, _) = normalize_sales(&raw);

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, None);
        assert_eq!(sales[0].lines[1].quantity, dec!(1.5));
    }

    #[test]
    fn test_list_of_sale_objects() {
        let raw = json!([
            {"items": [{"product": "Pen", "quantity": 1}]},
            {"lines": [{"name": "Paper", "quantity": 4}]},
            {"unrelated": true}
        ]);
        let (sales, issues) = normalize_sales(&raw);

        assert_eq!(sales.len(), 2);
        // unrecognized structure + "no valid lines"
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_product_names_are_trimmed() {
        let raw = json!([{"product": "  Pen ", "quantity": 2}, {"product": "   ", "quantity": 1}]);
        let (sales, issues) = normalize_sales(&raw);

        assert_eq!(sales, vec![Sale::new(vec![SaleLine::new("Pen", dec!(2))])]);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_container_object() {
        let raw = json!({"sales": [{"product": "Pen", "quantity": 1}]});
        let (sales, issues) = normalize_sales(&raw);
        assert!(issues.is_empty());
        assert_eq!(sales.len(), 1);
    }

    #[test]
    fn test_single_sale_object() {
        let raw = json!({"product": "Pen", "quantity": 5});
        let (sales, _) = normalize_sales(&raw);
        assert_eq!(sales, vec![Sale::new(vec![SaleLine::new("Pen", dec!(5))])]);
    }

    #[test]
    fn test_bad_quantities_are_skipped() {
        let raw = json!([
            {"Product": "Pen", "Quantity": 0},
            {"Product": "Pen", "Quantity": -3},
            {"Product": "Pen", "Quantity": "many"},
            {"Product": "", "Quantity": 1},
            {"Product": "Pen", "Quantity": 2}
        ]);
        let (sales, issues) = normalize_sales(&raw);

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].lines.len(), 1);
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().all(|i| i.kind == IssueKind::MalformedSaleLine));
    }

    #[test]
    fn test_empty_list_yields_no_sales() {
        let (sales, issues) = normalize_sales(&json!([]));
        assert!(sales.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_scalar_root_is_reported() {
        let (sales, issues) = normalize_sales(&json!("nope"));
        assert!(sales.is_empty());
        assert_eq!(issues.len(), 1);
    }
}
