//! Product catalog endpoints.
//!
//! Reads are public; writes require a bearer token and invalidate the
//! listing cache.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog::{Product, ProductFilter, ProductId};
use tracing::debug;

/// `GET /products` — list the catalog, optionally narrowed by
/// `?category=` and `?brand=`. Served through the listing cache.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError> {
    if let Some(hit) = state.listing_cache.get(&filter) {
        debug!(?filter, "listing cache hit");
        return Ok(Json(hit));
    }

    let products = state.products.list(&filter).await?;
    state.listing_cache.insert(filter, products.clone());
    Ok(Json(products))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))?;
    Ok(Json(product))
}

/// `POST /products` — create a catalog entry. Requires auth.
pub async fn create_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    state.products.insert(product.clone()).await?;
    state.listing_cache.clear();
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}` — replace a catalog entry. Requires auth.
pub async fn update_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<ProductId>,
    Json(product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    if product.id != id {
        return Err(ApiError::BadRequest(format!(
            "body id {} does not match path id {id}",
            product.id
        )));
    }
    state.products.update(product.clone()).await?;
    state.listing_cache.clear();
    Ok(Json(product))
}

/// `DELETE /products/{id}` — remove a catalog entry. Requires auth.
pub async fn delete_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    state.products.remove(id).await?;
    state.listing_cache.clear();
    Ok(StatusCode::NO_CONTENT)
}
