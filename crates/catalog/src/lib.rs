//! # Catalog Crate
//!
//! Domain records and persistence seams for the auto-parts storefront.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Product, Order, Recommendation)
//! - **store**: Traits for the store collaborators
//! - **memory**: In-memory store implementation with a category index
//! - **seed**: JSON seed-data loading
//! - **error**: Store error taxonomy
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{MemoryStore, ProductStore, seed::load_seed};
//! use std::path::Path;
//!
//! let store = load_seed(Path::new("data/seed"))?;
//! let product = store.get(1).await?;
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod seed;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{OrderStore, ProductStore, RecommendationStore};
pub use types::{
    // Type aliases
    OrderId,
    ProductId,
    UserId,
    // Core types
    Order,
    OrderItem,
    Product,
    ProductFilter,
    Recommendation,
    // Enums
    Category,
    OrderStatus,
};
