// 🏷️ Product Catalog - name → unit price
//
// Catalog files come in several shapes (array of products, plain mapping,
// array nested under a container key). Everything is normalized to a single
// HashMap; bad entries are skipped and recorded as issues.

use crate::error::{Issue, IssueKind};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

// ============================================================================
// FIELD ALIASES
// ============================================================================

/// Keys that may hold the product name (first present wins)
pub const NAME_KEYS: &[&str] = &["title", "product", "name", "Product"];

/// Keys that may hold the unit price
pub const PRICE_KEYS: &[&str] = &["price", "Price", "cost"];

/// Container keys for a nested product array
const CONTAINER_KEYS: &[&str] = &["catalogue", "products", "items"];

/// First non-null value among `keys`
pub fn first_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Convert a JSON value into an exact decimal
///
/// Accepts numbers (including exponent notation) and numeric strings.
/// Booleans, objects, arrays and null are rejected.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).ok()
    } else {
        Decimal::from_str(&text).ok()
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    prices: HashMap<String, Decimal>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, price: Decimal) {
        self.prices.insert(name.into(), price);
    }

    pub fn price(&self, name: &str) -> Option<Decimal> {
        self.prices.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Normalize any supported catalog JSON root
    ///
    /// Returns the catalog plus the entries that were skipped.
    pub fn from_json(raw: &Value) -> (Catalog, Vec<Issue>) {
        let mut catalog = Catalog::new();
        let mut issues = Vec::new();

        match raw {
            Value::Array(entries) => catalog.load_entries(entries, &mut issues),
            Value::Object(obj) => {
                let nested = CONTAINER_KEYS
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(|v| v.as_array()));

                match nested {
                    Some(entries) => catalog.load_entries(entries, &mut issues),
                    None => catalog.load_mapping(obj, &mut issues),
                }
            }
            _ => issues.push(Issue::new(
                IssueKind::MalformedCatalogEntry,
                "[ERROR] Unrecognized catalogue JSON structure.",
            )),
        }

        tracing::debug!("Catalog normalized: {} items, {} skipped", catalog.len(), issues.len());
        (catalog, issues)
    }

    fn load_entries(&mut self, entries: &[Value], issues: &mut Vec<Issue>) {
        for (idx, entry) in entries.iter().enumerate() {
            let position = idx + 1;

            let obj = match entry.as_object() {
                Some(obj) => obj,
                None => {
                    issues.push(Issue::new(
                        IssueKind::MalformedCatalogEntry,
                        format!("[ERROR] Catalogue entry #{} is not an object: {}", position, entry),
                    ));
                    continue;
                }
            };

            let name = first_field(obj, NAME_KEYS)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty());

            let name = match name {
                Some(name) => name,
                None => {
                    issues.push(Issue::new(
                        IssueKind::MalformedCatalogEntry,
                        format!("[ERROR] Catalogue entry #{} missing product name.", position),
                    ));
                    continue;
                }
            };

            match validate_price(first_field(obj, PRICE_KEYS), name) {
                Ok(price) => self.insert(name, price),
                Err(issue) => issues.push(issue),
            }
        }
    }

    fn load_mapping(&mut self, obj: &Map<String, Value>, issues: &mut Vec<Issue>) {
        for (name, value) in obj {
            let name = name.trim();
            if name.is_empty() {
                issues.push(Issue::new(
                    IssueKind::MalformedCatalogEntry,
                    "[ERROR] Catalogue entry with empty product name.",
                ));
                continue;
            }
            match validate_price(Some(value), name) {
                Ok(price) => self.insert(name, price),
                Err(issue) => issues.push(issue),
            }
        }
    }
}

/// Price must be numeric and non-negative
fn validate_price(value: Option<&Value>, name: &str) -> Result<Decimal, Issue> {
    let price = value.and_then(to_decimal).ok_or_else(|| {
        Issue::new(
            IssueKind::MalformedCatalogEntry,
            format!(
                "[ERROR] Invalid number for catalogue price for '{}': {}",
                name,
                value.map(|v| v.to_string()).unwrap_or_else(|| "missing".to_string())
            ),
        )
    })?;

    if price < Decimal::ZERO {
        return Err(Issue::new(
            IssueKind::MalformedCatalogEntry,
            format!("[ERROR] Negative price for '{}': {}", name, price),
        ));
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_catalog_from_product_array() {
        let raw = json!([
            {"title": "Rustic breakfast", "type": "breakfast", "price": 21.32},
            {"title": "Sandwich with salad", "price": 22.48}
        ]);
        let (catalog, issues) = Catalog::from_json(&raw);

        assert!(issues.is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.price("Rustic breakfast"), Some(dec!(21.32)));
        assert_eq!(catalog.price("Sandwich with salad"), Some(dec!(22.48)));
    }

    #[test]
    fn test_catalog_from_mapping() {
        let raw = json!({"Pen": 1.5, "Paper": "0.25"});
        let (catalog, issues) = Catalog::from_json(&raw);

        assert!(issues.is_empty());
        assert_eq!(catalog.price("Pen"), Some(dec!(1.5)));
        assert_eq!(catalog.price("Paper"), Some(dec!(0.25)));
    }

    #[test]
    fn test_catalog_mapping_names_are_trimmed() {
        let raw = json!({" Pen ": 1, "  ": 2});
        let (catalog, issues) = Catalog::from_json(&raw);

        assert_eq!(catalog.price("Pen"), Some(dec!(1)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_catalog_from_nested_container() {
        let raw = json!({"products": [{"name": "Pen", "cost": 2}]});
        let (catalog, _) = Catalog::from_json(&raw);
        assert_eq!(catalog.price("Pen"), Some(dec!(2)));
    }

    #[test]
    fn test_catalog_zero_price_is_kept() {
        // price 0 must not fall through to the next alias key
        let raw = json!([{"title": "Free sample", "price": 0, "cost": 9}]);
        let (catalog, issues) = Catalog::from_json(&raw);
        assert!(issues.is_empty());
        assert_eq!(catalog.price("Free sample"), Some(dec!(0)));
    }

    #[test]
    fn test_catalog_skips_bad_entries() {
        let raw = json!([
            {"title": "Good", "price": 3},
            {"title": "Negative", "price": -1},
            {"title": "Text", "price": "abc"},
            {"title": "Flag", "price": true},
            {"price": 5},
            "not an object"
        ]);
        let (catalog, issues) = Catalog::from_json(&raw);

        assert_eq!(catalog.len(), 1);
        assert_eq!(issues.len(), 5);
        assert!(issues.iter().all(|i| i.kind == IssueKind::MalformedCatalogEntry));
    }

    #[test]
    fn test_catalog_unrecognized_root() {
        let (catalog, issues) = Catalog::from_json(&json!(42));
        assert!(catalog.is_empty());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_to_decimal_scientific() {
        assert_eq!(to_decimal(&json!(1.5e2)), Some(dec!(150)));
        assert_eq!(to_decimal(&json!("2.5E1")), Some(dec!(25)));
        assert_eq!(to_decimal(&json!(null)), None);
    }
}
