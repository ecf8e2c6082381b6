//! # Recommendation Resolver
//!
//! The compute-or-reuse flow behind `GET /orders/recommendations/{order_id}`:
//! 1. Return the persisted recommendation for the order if one exists
//! 2. Otherwise load the order (absent -> `OrderNotFound`)
//! 3. Collect the distinct category and purchased-id sets from its items
//! 4. Query the product store for available, category-matching,
//!    not-yet-purchased candidates, capped at [`MAX_RECOMMENDATIONS`]
//! 5. Persist the result write-once; if a concurrent first lookup won the
//!    insert race, converge to the winner's record instead of failing
//!
//! The uniqueness constraint on the recommendation store is the sole
//! concurrency guard; there is no check-then-insert window to close beyond
//! the single convergence re-read.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::build_order_context;
use catalog::{
    OrderId, OrderStore, Product, ProductId, ProductStore, Recommendation, RecommendationStore,
    StoreError, UserId,
};

/// Upper bound on the recommended set for one order.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Errors surfaced to callers of [`RecommendationResolver::resolve`].
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The referenced order doesn't exist
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Lost the write-once race and the winning record could not be re-read
    #[error("conflicting recommendation write for order {0}")]
    Conflict(OrderId),

    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves the per-order recommendation set against the store collaborators.
#[derive(Clone)]
pub struct RecommendationResolver {
    products: Arc<dyn ProductStore>,
    orders: Arc<dyn OrderStore>,
    recommendations: Arc<dyn RecommendationStore>,
}

impl RecommendationResolver {
    /// Create a resolver over the three store collaborators.
    pub fn new(
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        recommendations: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self {
            products,
            orders,
            recommendations,
        }
    }

    /// Main entry point: get the recommended products for an order.
    ///
    /// # Arguments
    /// * `order_id` - The order to recommend against
    /// * `requesting_user` - Identity of the caller, recorded on a freshly
    ///   computed recommendation
    ///
    /// # Returns
    /// At most [`MAX_RECOMMENDATIONS`] products. The same order always
    /// resolves to the same set after the first call; there is no freshness
    /// check and no invalidation.
    pub async fn resolve(
        &self,
        order_id: OrderId,
        requesting_user: UserId,
    ) -> Result<Vec<Product>, ResolveError> {
        let start_time = Instant::now();

        // Cache hit path: reuse the persisted record, no recomputation
        if let Some(existing) = self.recommendations.get_by_order(order_id).await? {
            debug!(
                order_id,
                products = existing.recommended_products.len(),
                "recommendation cache hit"
            );
            return Ok(self.resolve_references(&existing).await?);
        }

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(ResolveError::OrderNotFound(order_id))?;

        // Resolve the line items to learn their categories (the document
        // store's populate step, collapsed into one bounded read)
        let item_ids: Vec<ProductId> = order.items.iter().map(|item| item.product_id).collect();
        let item_products = self.products.get_many(&item_ids).await?;
        let context = build_order_context(&order, &item_products);
        info!(
            order_id,
            categories = context.categories.len(),
            purchased = context.purchased.len(),
            "computing recommendations"
        );

        let candidates = if context.is_empty() {
            Vec::new()
        } else {
            self.products
                .find_available(&context.categories, &context.purchased, MAX_RECOMMENDATIONS)
                .await?
        };

        let record = Recommendation {
            order_id,
            user_id: requesting_user,
            recommended_products: candidates.iter().map(|product| product.id).collect(),
        };

        match self.recommendations.insert(record).await {
            Ok(()) => {
                info!(
                    order_id,
                    products = candidates.len(),
                    elapsed = ?start_time.elapsed(),
                    "recommendation computed and persisted"
                );
                Ok(candidates)
            }
            // A concurrent first lookup won the insert race. Converge to the
            // winner's record rather than surfacing the conflict.
            Err(StoreError::Conflict { .. }) => {
                warn!(order_id, "lost recommendation write race, re-reading winner");
                let winner = self
                    .recommendations
                    .get_by_order(order_id)
                    .await?
                    .ok_or(ResolveError::Conflict(order_id))?;
                Ok(self.resolve_references(&winner).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve a stored record's product references through the catalog.
    async fn resolve_references(
        &self,
        record: &Recommendation,
    ) -> Result<Vec<Product>, StoreError> {
        self.products.get_many(&record.recommended_products).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog::types::{Category, Order, OrderItem, OrderStatus};
    use catalog::{MemoryStore, ProductFilter};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn part(id: ProductId, category: Category, available: bool) -> Product {
        Product {
            id,
            name: format!("Part {id}"),
            brand: "Acme".to_string(),
            category,
            price_cents: 1000 + id,
            stock: 8,
            is_available: available,
        }
    }

    fn item(product_id: ProductId) -> OrderItem {
        OrderItem {
            product_id,
            qty: 1,
            price_cents_snapshot: 1000 + product_id,
        }
    }

    fn order(id: OrderId, user_id: UserId, items: Vec<OrderItem>) -> Order {
        Order {
            id,
            user_id,
            items,
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            status: OrderStatus::Completed,
        }
    }

    /// Catalog spanning two categories with purchased and alternative parts.
    fn build_test_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();

        // Brakes: 1 purchased, 2 and 3 alternatives, 4 out of stock
        store.insert_product(part(1, Category::Brakes, true)).unwrap();
        store.insert_product(part(2, Category::Brakes, true)).unwrap();
        store.insert_product(part(3, Category::Brakes, true)).unwrap();
        store.insert_product(part(4, Category::Brakes, false)).unwrap();

        // Engine: 10 purchased, 11-13 alternatives
        store.insert_product(part(10, Category::Engine, true)).unwrap();
        store.insert_product(part(11, Category::Engine, true)).unwrap();
        store.insert_product(part(12, Category::Engine, true)).unwrap();
        store.insert_product(part(13, Category::Engine, true)).unwrap();

        // Filters: never ordered, must never be recommended
        store.insert_product(part(20, Category::Filters, true)).unwrap();

        store
            .insert_order(order(100, 7, vec![item(1), item(10)]))
            .unwrap();
        store.insert_order(order(101, 7, vec![])).unwrap();

        Arc::new(store)
    }

    fn build_resolver(store: &Arc<MemoryStore>) -> RecommendationResolver {
        RecommendationResolver::new(store.clone(), store.clone(), store.clone())
    }

    /// Product store wrapper that counts candidate queries.
    struct CountingProducts {
        inner: Arc<MemoryStore>,
        candidate_queries: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for CountingProducts {
        async fn get(&self, id: ProductId) -> catalog::Result<Option<Product>> {
            ProductStore::get(self.inner.as_ref(), id).await
        }

        async fn get_many(&self, ids: &[ProductId]) -> catalog::Result<Vec<Product>> {
            self.inner.get_many(ids).await
        }

        async fn find_available(
            &self,
            categories: &HashSet<Category>,
            exclude: &HashSet<ProductId>,
            limit: usize,
        ) -> catalog::Result<Vec<Product>> {
            self.candidate_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_available(categories, exclude, limit).await
        }

        async fn list(&self, filter: &ProductFilter) -> catalog::Result<Vec<Product>> {
            self.inner.list(filter).await
        }

        async fn insert(&self, product: Product) -> catalog::Result<()> {
            ProductStore::insert(self.inner.as_ref(), product).await
        }

        async fn update(&self, product: Product) -> catalog::Result<()> {
            self.inner.update(product).await
        }

        async fn remove(&self, id: ProductId) -> catalog::Result<()> {
            self.inner.remove(id).await
        }
    }

    /// Recommendation store wrapper that simulates losing the first-lookup
    /// race: the first miss check reports no record even though the inner
    /// store already holds one, so the caller computes and then collides.
    struct RacingRecommendations {
        inner: Arc<MemoryStore>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl RecommendationStore for RacingRecommendations {
        async fn get_by_order(
            &self,
            order_id: OrderId,
        ) -> catalog::Result<Option<Recommendation>> {
            if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(None);
            }
            self.inner.get_by_order(order_id).await
        }

        async fn insert(&self, recommendation: Recommendation) -> catalog::Result<()> {
            RecommendationStore::insert(self.inner.as_ref(), recommendation).await
        }
    }

    // ============================================================================
    // Unit Tests: resolve
    // ============================================================================

    #[tokio::test]
    async fn test_resolve_matches_categories_and_excludes_purchased() {
        let store = build_test_store();
        let resolver = build_resolver(&store);

        let products = resolver.resolve(100, 7).await.unwrap();
        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();

        assert!(ids.len() <= MAX_RECOMMENDATIONS);
        // Purchased parts excluded
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&10));
        // Out-of-stock part excluded
        assert!(!ids.contains(&4));
        // Only the order's categories appear
        assert!(products
            .iter()
            .all(|p| p.category == Category::Brakes || p.category == Category::Engine));
        assert!(!ids.contains(&20));
    }

    #[tokio::test]
    async fn test_resolve_caps_at_four() {
        let store = build_test_store();
        let resolver = build_resolver(&store);

        // 5 eligible alternatives exist (2, 3, 11, 12, 13) but only 4 return
        let products = resolver.resolve(100, 7).await.unwrap();
        assert_eq!(products.len(), MAX_RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn test_second_resolve_reuses_record_without_candidate_query() {
        let store = build_test_store();
        let counting = Arc::new(CountingProducts {
            inner: store.clone(),
            candidate_queries: AtomicUsize::new(0),
        });
        let resolver =
            RecommendationResolver::new(counting.clone(), store.clone(), store.clone());

        let first = resolver.resolve(100, 7).await.unwrap();
        let second = resolver.resolve(100, 7).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(counting.candidate_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_order_yields_empty_list() {
        let store = build_test_store();
        let resolver = build_resolver(&store);

        let products = resolver.resolve(101, 7).await.unwrap();
        assert!(products.is_empty());

        // The empty result is still persisted write-once
        let record = store.get_by_order(101).await.unwrap().unwrap();
        assert!(record.recommended_products.is_empty());
        assert_eq!(record.user_id, 7);
    }

    #[tokio::test]
    async fn test_no_alternatives_yields_empty_list() {
        let store = MemoryStore::new();
        store.insert_product(part(1, Category::Brakes, true)).unwrap();
        store.insert_order(order(100, 7, vec![item(1)])).unwrap();
        let store = Arc::new(store);
        let resolver = build_resolver(&store);

        let products = resolver.resolve(100, 7).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let store = build_test_store();
        let resolver = build_resolver(&store);

        let err = resolver.resolve(999, 7).await.unwrap_err();
        assert!(matches!(err, ResolveError::OrderNotFound(999)));
    }

    // ============================================================================
    // Concurrency Tests
    // ============================================================================

    #[tokio::test]
    async fn test_concurrent_first_resolves_converge() {
        let store = build_test_store();
        let resolver = build_resolver(&store);

        let (first, second) = tokio::join!(resolver.resolve(100, 7), resolver.resolve(100, 8));
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first, second);

        // Exactly one record exists and it matches what both callers saw
        let record = store.get_by_order(100).await.unwrap().unwrap();
        let ids: Vec<ProductId> = first.iter().map(|p| p.id).collect();
        assert_eq!(record.recommended_products, ids);
    }

    #[tokio::test]
    async fn test_losing_writer_converges_to_winner() {
        let store = build_test_store();

        // The winner's record recommends a different set than this caller
        // would compute, so convergence is observable.
        store
            .insert_recommendation(Recommendation {
                order_id: 100,
                user_id: 99,
                recommended_products: vec![20],
            })
            .unwrap();

        let racing = Arc::new(RacingRecommendations {
            inner: store.clone(),
            reads: AtomicUsize::new(0),
        });
        let resolver = RecommendationResolver::new(store.clone(), store.clone(), racing);

        let products = resolver.resolve(100, 7).await.unwrap();
        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![20]);

        // The winner's record was not overwritten
        let record = store.get_by_order(100).await.unwrap().unwrap();
        assert_eq!(record.user_id, 99);
        assert_eq!(record.recommended_products, vec![20]);
    }
}
