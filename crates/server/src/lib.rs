//! Server crate for the auto-parts storefront API.
//!
//! Exposes the recommendation endpoint and the product catalog over HTTP,
//! with bearer-token auth on the recommendation and mutation routes and an
//! explicit TTL cache in front of product listings.

pub mod auth;
pub mod config;
pub mod error;
pub mod products;
pub mod recommendations;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
