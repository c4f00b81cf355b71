use crate::models::{Catalog, Product};

/// First `count` products in catalog order
pub fn first_products(catalog: &Catalog, count: usize) -> Vec<Product> {
    catalog.products().iter().take(count).cloned().collect()
}

/// All products whose name matches case-insensitively; empty when none do
pub fn products_by_name(catalog: &Catalog, product_name: &str) -> Vec<Product> {
    catalog.matching_name(product_name).cloned().collect()
}
