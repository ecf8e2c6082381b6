//! Server configuration, parsed from the command line.

use cache::TtlCache;
use catalog::{Product, ProductFilter, UserId};
use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Auto-parts storefront API server
#[derive(Parser, Debug)]
#[command(name = "parts-recs-server")]
#[command(about = "HTTP API for the auto-parts catalog and recommendations", long_about = None)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Directory holding products.json and orders.json
    #[arg(long, default_value = "data/seed")]
    pub data_dir: PathBuf,

    /// Listing cache TTL in seconds
    #[arg(long, default_value = "30")]
    pub cache_ttl_secs: u64,

    /// Listing cache capacity; unbounded when omitted, LRU eviction when set
    #[arg(long)]
    pub cache_capacity: Option<NonZeroUsize>,

    /// Bearer token as TOKEN:USER_ID; repeat the flag for more tokens
    #[arg(long = "token", value_name = "TOKEN:USER_ID", value_parser = parse_token)]
    pub tokens: Vec<(String, UserId)>,
}

impl ServerConfig {
    /// Build the listing cache the configuration describes.
    pub fn listing_cache(&self) -> TtlCache<ProductFilter, Vec<Product>> {
        let ttl = Duration::from_secs(self.cache_ttl_secs);
        match self.cache_capacity {
            Some(capacity) => TtlCache::with_capacity(ttl, capacity),
            None => TtlCache::new(ttl),
        }
    }

    /// The configured bearer tokens as a lookup table.
    pub fn token_map(&self) -> HashMap<String, UserId> {
        self.tokens.iter().cloned().collect()
    }
}

fn parse_token(raw: &str) -> Result<(String, UserId), String> {
    let (token, user_id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected TOKEN:USER_ID, got '{raw}'"))?;
    if token.is_empty() {
        return Err("token must not be empty".to_string());
    }
    let user_id = user_id
        .parse()
        .map_err(|_| format!("invalid user id '{user_id}'"))?;
    Ok((token.to_string(), user_id))
}
