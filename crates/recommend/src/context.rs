//! Order context building.
//!
//! Aggregates the two sets the candidate query needs — distinct categories
//! and distinct already-purchased product ids — once up front, so the
//! resolver doesn't re-walk the line items.

use catalog::{Category, Order, OrderId, ProductId, UserId};
use std::collections::HashSet;

/// Everything the candidate query needs to know about one order.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub order_id: OrderId,
    pub user_id: UserId,
    /// Distinct product categories appearing in the order's line items
    pub categories: HashSet<Category>,
    /// Distinct product ids already purchased, excluded from suggestions
    pub purchased: HashSet<ProductId>,
}

impl OrderContext {
    /// True when the order has no line items to draw categories from.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Build an [`OrderContext`] from an order and its resolved line items.
///
/// `categories` comes from the catalog entries referenced by the items;
/// items whose product no longer resolves contribute to `purchased` but not
/// to `categories`.
pub fn build_order_context(order: &Order, item_products: &[catalog::Product]) -> OrderContext {
    let mut context = OrderContext {
        order_id: order.id,
        user_id: order.user_id,
        categories: HashSet::new(),
        purchased: HashSet::new(),
    };

    for item in &order.items {
        context.purchased.insert(item.product_id);
    }
    for product in item_products {
        context.categories.insert(product.category);
    }

    context
}
