//! In-memory store implementation.
//!
//! `MemoryStore` backs the demo server, the CLI, and the test suites. It
//! keeps primary maps per record type plus a category secondary index so the
//! candidate query doesn't scan the whole catalog, and validates records on
//! insert the way a schema layer would.

use crate::error::{Result, StoreError};
use crate::store::{OrderStore, ProductStore, RecommendationStore};
use crate::types::{
    Category, Order, OrderId, Product, ProductFilter, ProductId, Recommendation,
};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Inner {
    // Primary record maps
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    recommendations: HashMap<OrderId, Recommendation>,

    /// Products grouped by category for the candidate query
    category_index: HashMap<Category, Vec<ProductId>>,
}

/// Thread-safe in-memory store implementing all three store traits.
///
/// Writes hold the lock only for the duration of the map mutation; nothing
/// awaits while locked.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    /// Insert a product, maintaining the category index.
    pub fn insert_product(&self, product: Product) -> Result<()> {
        let mut inner = self.write()?;
        if inner.products.contains_key(&product.id) {
            return Err(StoreError::Conflict {
                entity: "product",
                id: product.id,
            });
        }
        inner
            .category_index
            .entry(product.category)
            .or_default()
            .push(product.id);
        inner.products.insert(product.id, product);
        Ok(())
    }

    /// Replace an existing product, moving it between category buckets if
    /// its category changed.
    pub fn update_product(&self, product: Product) -> Result<()> {
        let mut inner = self.write()?;
        let Some(existing) = inner.products.get(&product.id) else {
            return Err(StoreError::NotFound {
                entity: "product",
                id: product.id,
            });
        };
        let old_category = existing.category;
        if old_category != product.category {
            if let Some(bucket) = inner.category_index.get_mut(&old_category) {
                bucket.retain(|&id| id != product.id);
            }
            inner
                .category_index
                .entry(product.category)
                .or_default()
                .push(product.id);
        }
        inner.products.insert(product.id, product);
        Ok(())
    }

    /// Delete a product and its index entry.
    pub fn remove_product(&self, id: ProductId) -> Result<()> {
        let mut inner = self.write()?;
        let Some(removed) = inner.products.remove(&id) else {
            return Err(StoreError::NotFound {
                entity: "product",
                id,
            });
        };
        if let Some(bucket) = inner.category_index.get_mut(&removed.category) {
            bucket.retain(|&entry| entry != id);
        }
        Ok(())
    }

    /// Insert an order after validating its line items.
    ///
    /// Every item must reference an existing product and carry a quantity of
    /// at least 1.
    pub fn insert_order(&self, order: Order) -> Result<()> {
        let mut inner = self.write()?;
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::Conflict {
                entity: "order",
                id: order.id,
            });
        }
        for item in &order.items {
            if item.qty == 0 {
                return Err(StoreError::InvalidRecord {
                    field: "qty",
                    reason: format!("order {} item {} has qty 0", order.id, item.product_id),
                });
            }
            if !inner.products.contains_key(&item.product_id) {
                return Err(StoreError::NotFound {
                    entity: "product",
                    id: item.product_id,
                });
            }
        }
        inner.orders.insert(order.id, order);
        Ok(())
    }

    /// Insert a recommendation record, enforcing one record per order.
    pub fn insert_recommendation(&self, recommendation: Recommendation) -> Result<()> {
        let mut inner = self.write()?;
        if inner.recommendations.contains_key(&recommendation.order_id) {
            return Err(StoreError::Conflict {
                entity: "recommendation",
                id: recommendation.order_id,
            });
        }
        inner
            .recommendations
            .insert(recommendation.order_id, recommendation);
        Ok(())
    }

    /// Synchronous core of [`ProductStore::find_available`].
    ///
    /// Walks the category buckets for the requested categories, drops
    /// unavailable and excluded products, and returns the first `limit`
    /// matches in ascending id order (the store-defined order).
    pub fn query_available(
        &self,
        categories: &HashSet<Category>,
        exclude: &HashSet<ProductId>,
        limit: usize,
    ) -> Result<Vec<Product>> {
        let inner = self.read()?;

        // BTreeSet gives a deterministic id order and dedups products whose
        // category appears in more than one bucket (it can't today, but the
        // query shouldn't depend on that).
        let mut candidate_ids: BTreeSet<ProductId> = BTreeSet::new();
        for category in categories {
            if let Some(bucket) = inner.category_index.get(category) {
                candidate_ids.extend(bucket.iter().copied());
            }
        }

        let products = candidate_ids
            .into_iter()
            .filter(|id| !exclude.contains(id))
            .filter_map(|id| inner.products.get(&id))
            .filter(|product| product.is_available)
            .take(limit)
            .cloned()
            .collect();
        Ok(products)
    }

    /// Record counts for logging: (products, orders, recommendations).
    pub fn counts(&self) -> Result<(usize, usize, usize)> {
        let inner = self.read()?;
        Ok((
            inner.products.len(),
            inner.orders.len(),
            inner.recommendations.len(),
        ))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let inner = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(id))
            .cloned()
            .collect())
    }

    async fn find_available(
        &self,
        categories: &HashSet<Category>,
        exclude: &HashSet<ProductId>,
        limit: usize,
    ) -> Result<Vec<Product>> {
        self.query_available(categories, exclude, limit)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let inner = self.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }

    async fn insert(&self, product: Product) -> Result<()> {
        self.insert_product(product)
    }

    async fn update(&self, product: Product) -> Result<()> {
        self.update_product(product)
    }

    async fn remove(&self, id: ProductId) -> Result<()> {
        self.remove_product(id)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn insert(&self, order: Order) -> Result<()> {
        self.insert_order(order)
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn get_by_order(&self, order_id: OrderId) -> Result<Option<Recommendation>> {
        Ok(self.read()?.recommendations.get(&order_id).cloned())
    }

    async fn insert(&self, recommendation: Recommendation) -> Result<()> {
        self.insert_recommendation(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderItem, OrderStatus};

    fn part(id: ProductId, category: Category, available: bool) -> Product {
        Product {
            id,
            name: format!("Part {id}"),
            brand: "Acme".to_string(),
            category,
            price_cents: 1000 + id,
            stock: 5,
            is_available: available,
        }
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_product(part(1, Category::Brakes, true)).unwrap();
        store.insert_product(part(2, Category::Brakes, true)).unwrap();
        store.insert_product(part(3, Category::Brakes, false)).unwrap();
        store.insert_product(part(4, Category::Engine, true)).unwrap();
        store.insert_product(part(5, Category::Filters, true)).unwrap();
        store
    }

    #[test]
    fn test_insert_product_rejects_duplicate_id() {
        let store = seeded_store();
        let err = store
            .insert_product(part(1, Category::Engine, true))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                entity: "product",
                id: 1
            }
        ));
    }

    #[test]
    fn test_update_product_moves_category_bucket() {
        let store = seeded_store();
        store.update_product(part(1, Category::Engine, true)).unwrap();

        let brakes = store
            .query_available(&HashSet::from([Category::Brakes]), &HashSet::new(), 10)
            .unwrap();
        assert!(brakes.iter().all(|p| p.id != 1));

        let engine = store
            .query_available(&HashSet::from([Category::Engine]), &HashSet::new(), 10)
            .unwrap();
        assert!(engine.iter().any(|p| p.id == 1));
    }

    #[test]
    fn test_remove_product_clears_index_entry() {
        let store = seeded_store();
        store.remove_product(2).unwrap();

        let brakes = store
            .query_available(&HashSet::from([Category::Brakes]), &HashSet::new(), 10)
            .unwrap();
        assert!(brakes.iter().all(|p| p.id != 2));
        assert!(matches!(
            store.remove_product(2),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_query_available_filters_and_caps() {
        let store = seeded_store();

        let results = store
            .query_available(
                &HashSet::from([Category::Brakes, Category::Engine]),
                &HashSet::from([2]),
                10,
            )
            .unwrap();

        // Product 2 excluded, product 3 unavailable, product 5 wrong category
        let ids: Vec<ProductId> = results.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let capped = store
            .query_available(
                &HashSet::from([Category::Brakes, Category::Engine]),
                &HashSet::new(),
                1,
            )
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn test_query_available_empty_category_set() {
        let store = seeded_store();
        let results = store
            .query_available(&HashSet::new(), &HashSet::new(), 10)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_insert_order_validates_items() {
        let store = seeded_store();

        let zero_qty = Order {
            id: 10,
            user_id: 1,
            items: vec![OrderItem {
                product_id: 1,
                qty: 0,
                price_cents_snapshot: 1001,
            }],
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            status: OrderStatus::Processing,
        };
        assert!(matches!(
            store.insert_order(zero_qty),
            Err(StoreError::InvalidRecord { field: "qty", .. })
        ));

        let dangling = Order {
            id: 11,
            user_id: 1,
            items: vec![OrderItem {
                product_id: 999,
                qty: 1,
                price_cents_snapshot: 500,
            }],
            subtotal_cents: 500,
            tax_cents: 0,
            total_cents: 500,
            status: OrderStatus::Processing,
        };
        assert!(matches!(
            store.insert_order(dangling),
            Err(StoreError::NotFound {
                entity: "product",
                id: 999
            })
        ));
    }

    #[test]
    fn test_recommendation_insert_is_write_once() {
        let store = seeded_store();
        let record = Recommendation {
            order_id: 42,
            user_id: 7,
            recommended_products: vec![1, 4],
        };

        store.insert_recommendation(record.clone()).unwrap();
        let err = store.insert_recommendation(record).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                entity: "recommendation",
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_get_many_preserves_order_and_skips_missing() {
        let store = seeded_store();
        let products = ProductStore::get_many(&store, &[4, 999, 1]).await.unwrap();
        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let store = seeded_store();

        let all = store.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 5);

        let brakes = store
            .list(&ProductFilter {
                category: Some(Category::Brakes),
                brand: None,
            })
            .await
            .unwrap();
        assert_eq!(brakes.len(), 3);
    }
}
