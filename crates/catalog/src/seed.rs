//! Seed-data loading.
//!
//! Builds a [`MemoryStore`] from a directory holding `products.json` and
//! `orders.json`. Recommendations are never seeded; they only come into
//! existence through the resolver.

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::types::{Order, Product};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading seed data.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Seed directory is missing one of the expected files
    #[error("missing seed file: {path}")]
    MissingFile { path: String },

    /// I/O error occurred while reading a seed file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A seed file isn't valid JSON for the expected shape
    #[error("malformed seed file {file}: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A seed record failed store validation
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    if !path.exists() {
        return Err(SeedError::MissingFile {
            path: path.display().to_string(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| SeedError::Malformed {
        file: path.display().to_string(),
        source,
    })
}

/// Load a seed directory into a fresh store.
///
/// Products are loaded before orders so order line items can be validated
/// against the catalog.
pub fn load_seed(dir: &Path) -> Result<MemoryStore, SeedError> {
    let products: Vec<Product> = read_json(&dir.join("products.json"))?;
    let orders: Vec<Order> = read_json(&dir.join("orders.json"))?;

    let store = MemoryStore::new();
    for product in products {
        store.insert_product(product)?;
    }
    for order in orders {
        store.insert_order(order)?;
    }

    let (product_count, order_count, _) = store.counts()?;
    info!(
        products = product_count,
        orders = order_count,
        "loaded seed data from {}",
        dir.display()
    );
    Ok(store)
}
