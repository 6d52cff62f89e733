//! # Document store
//!
//! Two collections, **categories** and **products**, addressed by string ids.
//!
//! Product names are unique. Both backends keep a name → id index and claim a name
//! atomically on insert and rename, so a write that races past the access layer's
//! pre-check still fails with [`StoreError::DuplicateName`] instead of storing a twin.
//!
//! ## Backends
//! - [`RedisStore`]: one Redis hash per collection, JSON documents as values
//! - [`MemoryStore`]: the same collections in process, used by tests and `memory://`
use async_trait::async_trait;
use catalog::{Category, Product};
use thiserror::Error;

use crate::search::{ProductFilter, Window};

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product name already taken: {0}")]
    DuplicateName(String),

    #[error("Backend error: {0}")]
    Backend(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Every category, in no particular order.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn category(&self, id: &str) -> Result<Option<Category>, StoreError>;

    /// Categories whose id appears in `ids`. Unknown ids are skipped.
    async fn find_categories(&self, ids: &[String]) -> Result<Vec<Category>, StoreError>;

    /// Drops every category and stores `categories` in their place.
    async fn replace_categories(&self, categories: &[Category]) -> Result<(), StoreError>;

    async fn product(&self, id: &str) -> Result<Option<Product>, StoreError>;

    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    /// Matching products, newest first, windowed.
    async fn find_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<Vec<Product>, StoreError>;

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Overwrites an existing product. `previous_name` is released when the name changed.
    async fn save_product(&self, previous_name: &str, product: &Product) -> Result<(), StoreError>;

    /// Removes the product and returns what was stored, if anything.
    async fn delete_product(&self, id: &str) -> Result<Option<Product>, StoreError>;
}
