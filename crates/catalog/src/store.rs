//! Store traits for the external persistence collaborators.
//!
//! The rest of the system only speaks to these traits; `MemoryStore`
//! implements all three for tests, the CLI, and the demo server. A
//! document-store-backed implementation would slot in behind the same
//! seams.

use crate::error::Result;
use crate::types::{Category, Order, OrderId, Product, ProductFilter, ProductId, Recommendation};
use async_trait::async_trait;
use std::collections::HashSet;

/// Read and write access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetch one product by id.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Resolve a list of product references, preserving the requested order.
    ///
    /// Ids that no longer resolve are skipped rather than failing the whole
    /// lookup; a stored recommendation may reference a since-removed product.
    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    /// Candidate query for the recommendation flow: available products whose
    /// category is in `categories` and whose id is not in `exclude`, capped
    /// at `limit`. Result order is store-defined; no ranking is implied.
    async fn find_available(
        &self,
        categories: &HashSet<Category>,
        exclude: &HashSet<ProductId>,
        limit: usize,
    ) -> Result<Vec<Product>>;

    /// List catalog products, optionally narrowed by `filter`.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    /// Insert a new product. Fails with `Conflict` if the id is taken.
    async fn insert(&self, product: Product) -> Result<()>;

    /// Replace an existing product. Fails with `NotFound` if absent.
    async fn update(&self, product: Product) -> Result<()>;

    /// Delete a product. Fails with `NotFound` if absent.
    async fn remove(&self, id: ProductId) -> Result<()>;
}

/// Read access to persisted orders.
///
/// Orders are created at checkout, outside this system; `insert` exists for
/// seeding and tests.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetch one order by id, line items included.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Insert a new order. Fails with `Conflict` if the id is taken.
    async fn insert(&self, order: Order) -> Result<()>;
}

/// Write-once storage for per-order recommendation records.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Fetch the recommendation record for an order, if one was ever written.
    async fn get_by_order(&self, order_id: OrderId) -> Result<Option<Recommendation>>;

    /// Insert a recommendation record.
    ///
    /// The uniqueness invariant is the sole concurrency guard for the
    /// compute-or-reuse flow: a duplicate insert must fail with `Conflict`,
    /// never silently overwrite.
    async fn insert(&self, recommendation: Recommendation) -> Result<()>;
}
