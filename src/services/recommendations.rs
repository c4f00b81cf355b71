use std::{cmp::Ordering, collections::HashSet};

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Product},
};

/// Recommends products from the same category as `product_name`
///
/// The first case-insensitive name match is the reference product. Its
/// same-category peers (excluding the reference itself) are ranked by
/// `purchase_count` when the catalog has that column, exact duplicate
/// records are dropped, and at most `top_n` are returned. A row-position
/// index is not part of a record when looking for duplicates.
pub fn recommend_similar_products(
    catalog: &Catalog,
    product_name: &str,
    top_n: usize,
) -> AppResult<Vec<Product>> {
    let product = catalog
        .find_by_name(product_name)
        .ok_or_else(|| AppError::product_not_found(product_name))?;

    let mut candidates: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| p.category == product.category && p.index != product.index)
        .collect();

    if catalog.has_purchase_count() {
        // stable: equal counts keep catalog order
        candidates.sort_by(|a, b| by_popularity(a.purchase_count, b.purchase_count));
    }

    // a positional index differs per row, so it cannot tell repeated rows apart
    let include_index = catalog.has_source_index();
    let mut seen = HashSet::new();
    let recommendations = candidates
        .into_iter()
        .filter(|p| seen.insert(p.record_key(include_index)))
        .take(top_n)
        .cloned()
        .collect();

    Ok(recommendations)
}

/// Resolves the requested result size
///
/// A missing value falls back to `default`; zero or negative values clamp to
/// an empty result.
pub fn resolve_top_n(requested: Option<i64>, default: usize) -> usize {
    match requested {
        None => default,
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Descending by count; products without a count go last
fn by_popularity(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
