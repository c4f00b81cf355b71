use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::BTreeMap;

/// A single catalog entry
///
/// Equality covers every field, including the passthrough attributes, so two
/// repeated source rows compare equal while same-named products from
/// different rows do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    /// Identifier, unique within a loaded catalog
    pub index: i64,
    /// Display name, matched case-insensitively
    #[serde(rename = "product_name")]
    pub name: String,
    pub category: String,
    /// Popularity metric, when the catalog carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_count: Option<i64>,
    /// Remaining source columns keyed by their original header
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Passthrough columns, kept as the raw cell text
///
/// Cells are compared as text but serialized with their natural JSON type:
/// numeric cells become numbers and empty cells become `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Attributes(BTreeMap<String, String>);

/// Identity used when collapsing repeated rows
///
/// Leaves out `index` when the catalog assigned it from row position, since a
/// positional index differs for every row by construction.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RecordKey<'a> {
    index: Option<i64>,
    name: &'a str,
    category: &'a str,
    purchase_count: Option<i64>,
    attributes: &'a Attributes,
}

impl Product {
    /// Creates a product with no passthrough attributes
    pub fn new(index: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            category: category.into(),
            purchase_count: None,
            attributes: Attributes::default(),
        }
    }

    pub fn with_purchase_count(mut self, purchase_count: i64) -> Self {
        self.purchase_count = Some(purchase_count);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.0.insert(key.into(), value.into());
        self
    }

    pub fn record_key(&self, include_index: bool) -> RecordKey<'_> {
        RecordKey {
            index: include_index.then_some(self.index),
            name: &self.name,
            category: &self.category,
            purchase_count: self.purchase_count,
            attributes: &self.attributes,
        }
    }
}

impl Attributes {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, cell) in &self.0 {
            map.serialize_entry(key, &cell_value(cell))?;
        }
        map.end()
    }
}

/// JSON value for a raw CSV cell
fn cell_value(cell: &str) -> serde_json::Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return serde_json::Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return n.into();
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(cell.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_flat_record() {
        let product = Product::new(7, "Widget", "Tools")
            .with_purchase_count(12)
            .with_attribute("BRAND", "Acme");

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({
                "index": 7,
                "product_name": "Widget",
                "category": "Tools",
                "purchase_count": 12,
                "BRAND": "Acme"
            })
        );
    }

    #[test]
    fn test_attributes_keep_natural_json_types() {
        let product = Product::new(1, "Widget", "Tools")
            .with_attribute("PRICE", "12.99")
            .with_attribute("STOCK", "40")
            .with_attribute("RATING", "")
            .with_attribute("SKU", "A-100")
            .with_attribute("NOTE", "NaN");

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["PRICE"], json!(12.99));
        assert_eq!(value["STOCK"], json!(40));
        assert_eq!(value["RATING"], json!(null));
        assert_eq!(value["SKU"], json!("A-100"));
        assert_eq!(value["NOTE"], json!("NaN"));
    }

    #[test]
    fn test_omits_missing_purchase_count() {
        let value = serde_json::to_value(Product::new(1, "Lamp", "Home")).unwrap();
        assert!(value.get("purchase_count").is_none());
    }

    #[test]
    fn test_equality_covers_attributes() {
        let a = Product::new(1, "Widget", "Tools").with_attribute("COLOR", "red");
        let b = Product::new(1, "Widget", "Tools").with_attribute("COLOR", "red");
        let c = Product::new(1, "Widget", "Tools").with_attribute("COLOR", "blue");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_record_key_without_index() {
        let a = Product::new(1, "Rake", "Garden").with_attribute("BRAND", "Acme");
        let b = Product::new(2, "Rake", "Garden").with_attribute("BRAND", "Acme");

        assert_ne!(a.record_key(true), b.record_key(true));
        assert_eq!(a.record_key(false), b.record_key(false));
    }
}
