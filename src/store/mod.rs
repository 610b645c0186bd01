//! Shared in-process merchant state
//!
//! One [`MerchantStore`] instance is created at wiring time and handed to
//! every tool that needs it; nothing here is global. Commerce payloads (cart
//! contents, risk data) stay opaque JSON, since their schemas belong to
//! external collaborators. Nothing survives process restart.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// How long a stored cart stays retrievable
pub const DEFAULT_CART_TTL_MINUTES: i64 = 15;

/// Query tokens too generic to score against the catalog
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "the", "for", "of", "in", "with", "to", "me", "my", "i", "please", "find",
    "show", "want", "need", "some", "get", "buy",
];

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

#[derive(Debug)]
struct CartRecord {
    contents: Value,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    carts: HashMap<String, CartRecord>,
    risk_data: HashMap<String, Value>,
}

/// Catalog, cart, and risk-data storage shared across tool invocations
///
/// Writers take the lock exclusively; concurrent reads proceed in parallel.
/// Cheap to clone, all clones share the same state.
#[derive(Debug, Clone)]
pub struct MerchantStore {
    inner: Arc<std::sync::RwLock<Inner>>,
    cart_ttl: Duration,
}

impl Default for MerchantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MerchantStore {
    /// Create an empty store with the default cart TTL
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            cart_ttl: Duration::minutes(DEFAULT_CART_TTL_MINUTES),
        }
    }

    /// Create a store seeded with a product catalog
    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().expect("store lock poisoned");
            inner.products = products;
        }
        store
    }

    /// Override the cart TTL
    pub fn with_cart_ttl(mut self, ttl: Duration) -> Self {
        self.cart_ttl = ttl;
        self
    }

    /// Snapshot of the full catalog
    pub fn products(&self) -> Vec<Product> {
        self.inner
            .read()
            .expect("store lock poisoned")
            .products
            .clone()
    }

    /// Rank catalog entries against a free-text query
    ///
    /// Each non-stop-word query token scores 3 for a name hit, 2 for a
    /// description hit, and 1 for a category hit; a name containing the whole
    /// query earns a bonus. Results come back sorted by score, best first,
    /// zero-score entries dropped.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        let tokens: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .filter(|token| !STOP_WORDS.contains(token))
            .map(str::to_string)
            .collect();

        if tokens.is_empty() {
            return Vec::new();
        }

        let whole_query = tokens.join(" ");
        let inner = self.inner.read().expect("store lock poisoned");

        let mut scored: Vec<(u32, Product)> = inner
            .products
            .iter()
            .filter_map(|product| {
                let name = product.name.to_lowercase();
                let description = product.description.to_lowercase();
                let category = product.category.to_lowercase();

                let mut score = 0u32;
                for token in &tokens {
                    if name.contains(token) {
                        score += 3;
                    }
                    if description.contains(token) {
                        score += 2;
                    }
                    if category.contains(token) {
                        score += 1;
                    }
                }
                if name.contains(&whole_query) {
                    score += 5;
                }

                (score > 0).then(|| (score, product.clone()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, product)| product).collect()
    }

    /// Store new cart contents under a generated cart id
    pub fn create_cart(&self, contents: Value) -> String {
        let cart_id = Uuid::now_v7().to_string();
        self.put_cart(&cart_id, contents);
        cart_id
    }

    /// Store or replace cart contents, refreshing the expiry
    pub fn put_cart(&self, cart_id: &str, contents: Value) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.carts.insert(
            cart_id.to_string(),
            CartRecord {
                contents,
                expires_at: Utc::now() + self.cart_ttl,
            },
        );
    }

    /// Fetch cart contents; `None` when the cart is unknown or expired
    ///
    /// Expired entries are pruned on read rather than by a sweeper.
    pub fn get_cart(&self, cart_id: &str) -> Option<Value> {
        let expired = {
            let inner = self.inner.read().expect("store lock poisoned");
            match inner.carts.get(cart_id) {
                Some(record) if record.expires_at > Utc::now() => {
                    return Some(record.contents.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut inner = self.inner.write().expect("store lock poisoned");
            inner.carts.remove(cart_id);
        }
        None
    }

    /// Attach opaque risk data to a context
    pub fn store_risk_data(&self, context_id: &str, data: Value) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.risk_data.insert(context_id.to_string(), data);
    }

    /// Risk data previously attached to a context
    pub fn risk_data(&self, context_id: &str) -> Option<Value> {
        self.inner
            .read()
            .expect("store lock poisoned")
            .risk_data
            .get(context_id)
            .cloned()
    }
}
