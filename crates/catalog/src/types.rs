//! Core domain types for the auto-parts catalog.
//!
//! This module defines the records the rest of the system moves around:
//! products, orders with their line items, and the per-order recommendation
//! record. All of them serialize to the camelCase JSON the HTTP API and the
//! seed files use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up order IDs with product IDs

/// Unique identifier for a product
pub type ProductId = u32;

/// Unique identifier for an order
pub type OrderId = u32;

/// Unique identifier for a user
pub type UserId = u32;

// =============================================================================
// Product-related Types
// =============================================================================

/// A part in the catalog.
///
/// Prices are stored in cents so the non-negative invariant holds by
/// construction and no float arithmetic is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub price_cents: u32,
    pub stock: u32,
    pub is_available: bool,
}

/// Part categories carried by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Brakes,
    Engine,
    Suspension,
    Electrical,
    Filters,
    Exhaust,
    Cooling,
    Transmission,
    Ignition,
    Interior,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::Brakes,
        Category::Engine,
        Category::Suspension,
        Category::Electrical,
        Category::Filters,
        Category::Exhaust,
        Category::Cooling,
        Category::Transmission,
        Category::Ignition,
        Category::Interior,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Brakes => "Brakes",
            Category::Engine => "Engine",
            Category::Suspension => "Suspension",
            Category::Electrical => "Electrical",
            Category::Filters => "Filters",
            Category::Exhaust => "Exhaust",
            Category::Cooling => "Cooling",
            Category::Transmission => "Transmission",
            Category::Ignition => "Ignition",
            Category::Interior => "Interior",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive parse, used by the CLI and query strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Optional narrowing criteria for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub brand: Option<String>,
}

impl ProductFilter {
    /// True when the filter does not narrow the listing at all.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.brand.is_none()
    }

    /// Check a product against the filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if !product.brand.eq_ignore_ascii_case(brand) {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Order-related Types
// =============================================================================

/// A single line item on an order.
///
/// `price_cents_snapshot` is the unit price at checkout time; later catalog
/// price changes do not touch stored orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    /// Quantity purchased, must be at least 1
    pub qty: u32,
    pub price_cents_snapshot: u32,
}

/// A customer order. Created at checkout; the items list is immutable once
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: u32,
    pub tax_cents: u32,
    pub total_cents: u32,
    pub status: OrderStatus,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Completed,
    Cancelled,
}

// =============================================================================
// Recommendation Record
// =============================================================================

/// The persisted recommendation set for one order.
///
/// Created lazily on the first lookup for an order and never updated
/// afterwards; the store enforces at most one record per `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub order_id: OrderId,
    pub user_id: UserId,
    /// Ordered product references, at most the resolver's cap
    pub recommended_products: Vec<ProductId>,
}
