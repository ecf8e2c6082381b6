//! Shared request-handling state.

use cache::TtlCache;
use catalog::{OrderStore, Product, ProductFilter, ProductStore, RecommendationStore, UserId};
use recommend::RecommendationResolver;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a handler needs, cloned per request.
///
/// The listing cache lives here as an explicit instance rather than as
/// process-global state; handlers that mutate the catalog clear it.
#[derive(Clone)]
pub struct AppState {
    pub resolver: RecommendationResolver,
    pub products: Arc<dyn ProductStore>,
    pub listing_cache: Arc<TtlCache<ProductFilter, Vec<Product>>>,
    /// Bearer token -> user identity, loaded at startup
    pub tokens: Arc<HashMap<String, UserId>>,
}

impl AppState {
    /// Wire the state up from the store collaborators.
    pub fn new(
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        recommendations: Arc<dyn RecommendationStore>,
        listing_cache: TtlCache<ProductFilter, Vec<Product>>,
        tokens: HashMap<String, UserId>,
    ) -> Self {
        Self {
            resolver: RecommendationResolver::new(products.clone(), orders, recommendations),
            products,
            listing_cache: Arc::new(listing_cache),
            tokens: Arc::new(tokens),
        }
    }
}
