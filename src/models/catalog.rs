use std::{collections::HashSet, fs::File, io::Read, path::Path};

use csv::StringRecord;

use crate::{
    error::{AppError, AppResult},
    models::Product,
};

const INDEX_COLUMN: &str = "index";
const NAME_COLUMN: &str = "product_name";
const CATEGORY_COLUMN: &str = "category";
const PURCHASE_COUNT_COLUMN: &str = "purchase_count";

/// Immutable, ordered product collection
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    /// Lowercased product names, parallel to `products`
    name_keys: Vec<String>,
    has_purchase_count: bool,
    /// `index` values were assigned from row position, not read from the source
    positional_index: bool,
}

impl Catalog {
    /// Creates a catalog from already-parsed products
    ///
    /// `has_purchase_count` records whether the source schema carries the
    /// popularity column, independently of whether any row has a value.
    pub fn new(products: Vec<Product>, has_purchase_count: bool) -> Self {
        let name_keys = products.iter().map(|p| p.name.to_lowercase()).collect();
        Self {
            products,
            name_keys,
            has_purchase_count,
            positional_index: false,
        }
    }

    /// Marks the `index` values as row positions rather than source identifiers
    pub fn with_positional_index(mut self) -> Self {
        self.positional_index = true;
        self
    }

    /// Loads a catalog from a CSV file on disk
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::Catalog(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Parses a catalog from CSV with a header row
    ///
    /// Headers are matched case-insensitively. `PRODUCT_NAME` and `CATEGORY`
    /// are required; without an `index` column the row position is used.
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = Columns::resolve(&headers)?;

        let mut products = Vec::new();
        for (position, record) in reader.records().enumerate() {
            let record = record?;
            products.push(columns.product(&headers, &record, position)?);
        }

        let mut seen = HashSet::new();
        let repeated = products.iter().filter(|p| !seen.insert(p.index)).count();
        if repeated > 0 {
            tracing::warn!(repeated, "Catalog contains repeated index values");
        }

        tracing::info!(
            product_count = products.len(),
            has_index = columns.index.is_some(),
            has_purchase_count = columns.purchase_count.is_some(),
            "Loaded product catalog"
        );

        let catalog = Self::new(products, columns.purchase_count.is_some());
        Ok(match columns.index {
            Some(_) => catalog,
            None => catalog.with_positional_index(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether the schema has a `purchase_count` column
    pub fn has_purchase_count(&self) -> bool {
        self.has_purchase_count
    }

    /// Whether `index` comes from the source rather than row position
    ///
    /// Only a source index is part of a product's identity when collapsing
    /// repeated rows.
    pub fn has_source_index(&self) -> bool {
        !self.positional_index
    }

    /// First product whose name matches case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.matching_name(name).next()
    }

    /// Every product whose name matches case-insensitively, in catalog order
    pub fn matching_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Product> + 'a {
        let key = name.to_lowercase();
        self.products
            .iter()
            .zip(&self.name_keys)
            .filter(move |(_, k)| **k == key)
            .map(|(p, _)| p)
    }
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct Columns {
    index: Option<usize>,
    name: usize,
    category: usize,
    purchase_count: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> AppResult<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
        };
        let require = |column: &str| {
            find(column).ok_or_else(|| {
                AppError::Catalog(format!("Missing required column '{}'", column.to_uppercase()))
            })
        };

        Ok(Self {
            index: find(INDEX_COLUMN),
            name: require(NAME_COLUMN)?,
            category: require(CATEGORY_COLUMN)?,
            purchase_count: find(PURCHASE_COUNT_COLUMN),
        })
    }

    fn is_known(&self, position: usize) -> bool {
        Some(position) == self.index
            || position == self.name
            || position == self.category
            || Some(position) == self.purchase_count
    }

    fn product(
        &self,
        headers: &StringRecord,
        record: &StringRecord,
        position: usize,
    ) -> AppResult<Product> {
        let cell = |column: usize| record.get(column).unwrap_or_default();
        // header is line 1
        let line = position + 2;

        let index = match self.index {
            Some(column) => parse_integer(cell(column)).ok_or_else(|| {
                AppError::Catalog(format!(
                    "Line {}: invalid index '{}'",
                    line,
                    cell(column)
                ))
            })?,
            None => position as i64,
        };

        let purchase_count = match self.purchase_count {
            Some(column) if !cell(column).trim().is_empty() => {
                Some(parse_integer(cell(column)).ok_or_else(|| {
                    AppError::Catalog(format!(
                        "Line {}: invalid purchase_count '{}'",
                        line,
                        cell(column)
                    ))
                })?)
            }
            _ => None,
        };

        let attributes = headers
            .iter()
            .enumerate()
            .filter(|(column, _)| !self.is_known(*column))
            .map(|(column, header)| (header.to_string(), cell(column).to_string()))
            .collect();

        Ok(Product {
            index,
            name: cell(self.name).to_string(),
            category: cell(self.category).to_string(),
            purchase_count,
            attributes,
        })
    }
}

/// Parses an integer cell, accepting whole-valued floats such as `12.0`
///
/// Floats outside the `i64` range are rejected rather than saturated.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
            .map(|v| v as i64)
    })
}
