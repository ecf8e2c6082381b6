//! # Recommend Crate
//!
//! The recommendation resolver for the auto-parts storefront.
//!
//! ## Components
//!
//! - **context**: Collapses an order's line items into the category and
//!   purchased-id sets the candidate query needs
//! - **resolver**: The compute-or-reuse flow with write-once persistence
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommend::RecommendationResolver;
//! use std::sync::Arc;
//!
//! let resolver = RecommendationResolver::new(
//!     store.clone(),
//!     store.clone(),
//!     store.clone(),
//! );
//! let products = resolver.resolve(order_id, user_id).await?;
//! ```

// Public modules
pub mod context;
pub mod resolver;

// Re-export commonly used types
pub use context::{build_order_context, OrderContext};
pub use resolver::{RecommendationResolver, ResolveError, MAX_RECOMMENDATIONS};
