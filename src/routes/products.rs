use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, models::Product, routes::AppState, services::catalog_browse};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    no_of_product: usize,
}

#[derive(Debug, Deserialize)]
pub struct ByNameQuery {
    product_name: String,
}

/// Handler for listing the first N catalog products
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(params) = query?;
    Ok(Json(catalog_browse::first_products(
        &state.catalog,
        params.no_of_product,
    )))
}

/// Handler for exact (case-insensitive) name lookup
pub async fn by_name(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ByNameQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(params) = query?;
    let products = catalog_browse::products_by_name(&state.catalog, &params.product_name);
    tracing::debug!(
        product_name = %params.product_name,
        match_count = products.len(),
        "Product lookup by name"
    );
    Ok(Json(products))
}
