//! Router assembly.

use crate::state::AppState;
use crate::{products, recommendations};
use axum::routing::get;
use axum::Router;

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/orders/recommendations/{order_id}",
            get(recommendations::get_order_recommendations),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
