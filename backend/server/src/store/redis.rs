use std::collections::HashMap;

use ::redis::{AsyncCommands, Script, aio::ConnectionManager, cmd, pipe};
use async_trait::async_trait;
use catalog::{Category, Product};
use serde::de::DeserializeOwned;

use super::{Store, StoreError};
use crate::search::{ProductFilter, Window, select};

pub const DEFAULT_PREFIX: &str = "inventory";

/// KEYS: names, products. ARGV: name, id, json. Returns 0 when the name is taken.
const INSERT_PRODUCT: &str = r"
if redis.call('HSETNX', KEYS[1], ARGV[1], ARGV[2]) == 0 then
    return 0
end
redis.call('HSET', KEYS[2], ARGV[2], ARGV[3])
return 1
";

/// KEYS: names, products. ARGV: name, id, json, previous name.
/// Returns 0 when the name belongs to another product.
const SAVE_PRODUCT: &str = r"
local owner = redis.call('HGET', KEYS[1], ARGV[1])
if owner and owner ~= ARGV[2] then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
redis.call('HSET', KEYS[2], ARGV[2], ARGV[3])
if ARGV[4] ~= ARGV[1] and redis.call('HGET', KEYS[1], ARGV[4]) == ARGV[2] then
    redis.call('HDEL', KEYS[1], ARGV[4])
end
return 1
";

/// Collections live in three hashes under a shared key prefix:
/// - `{prefix}:categories`: id → category JSON
/// - `{prefix}:products`: id → product JSON
/// - `{prefix}:product_names`: name → id
///
/// Product writes run as Lua scripts so a name claim and its document land together.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    categories_key: String,
    products_key: String,
    names_key: String,
    insert_script: Script,
    save_script: Script,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager, prefix: &str) -> Self {
        Self {
            connection,
            categories_key: format!("{prefix}:categories"),
            products_key: format!("{prefix}:products"),
            names_key: format!("{prefix}:product_names"),
            insert_script: Script::new(INSERT_PRODUCT),
            save_script: Script::new(SAVE_PRODUCT),
        }
    }

    async fn all<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: HashMap<String, String> = connection.hgetall(key).await?;

        raw.values()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn one<T: DeserializeOwned>(&self, key: &str, id: &str) -> Result<Option<T>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(key, id).await?;

        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }
}

#[async_trait]
impl Store for RedisStore {
    fn backend_tag(&self) -> &'static str {
        "redis"
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.all(&self.categories_key).await
    }

    async fn category(&self, id: &str) -> Result<Option<Category>, StoreError> {
        self.one(&self.categories_key, id).await
    }

    async fn find_categories(&self, ids: &[String]) -> Result<Vec<Category>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut connection = self.connection.clone();
        let raw: Vec<Option<String>> = cmd("HMGET")
            .arg(&self.categories_key)
            .arg(ids.to_vec())
            .query_async(&mut connection)
            .await?;

        raw.into_iter()
            .flatten()
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .collect()
    }

    async fn replace_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        let documents = categories
            .iter()
            .map(|c| serde_json::to_string(c).map(|json| (c.id.clone(), json)))
            .collect::<Result<Vec<(String, String)>, _>>()?;

        let mut pipeline = pipe();
        pipeline.atomic().del(&self.categories_key).ignore();
        if !documents.is_empty() {
            pipeline.hset_multiple(&self.categories_key, &documents).ignore();
        }

        let mut connection = self.connection.clone();
        let () = pipeline.query_async(&mut connection).await?;

        Ok(())
    }

    async fn product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        self.one(&self.products_key, id).await
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let mut connection = self.connection.clone();
        let id: Option<String> = connection.hget(&self.names_key, name).await?;

        match id {
            Some(id) => self.product(&id).await,
            None => Ok(None),
        }
    }

    async fn find_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<Vec<Product>, StoreError> {
        let products: Vec<Product> = self.all(&self.products_key).await?;

        Ok(select(products, filter, window))
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let products: Vec<Product> = self.all(&self.products_key).await?;

        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let json = serde_json::to_string(product)?;
        let mut connection = self.connection.clone();

        let inserted: bool = self
            .insert_script
            .key(&self.names_key)
            .key(&self.products_key)
            .arg(&product.name)
            .arg(&product.id)
            .arg(json)
            .invoke_async(&mut connection)
            .await?;
        if !inserted {
            return Err(StoreError::DuplicateName(product.name.clone()));
        }

        Ok(())
    }

    async fn save_product(&self, previous_name: &str, product: &Product) -> Result<(), StoreError> {
        let json = serde_json::to_string(product)?;
        let mut connection = self.connection.clone();

        let saved: bool = self
            .save_script
            .key(&self.names_key)
            .key(&self.products_key)
            .arg(&product.name)
            .arg(&product.id)
            .arg(json)
            .arg(previous_name)
            .invoke_async(&mut connection)
            .await?;
        if !saved {
            return Err(StoreError::DuplicateName(product.name.clone()));
        }

        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let Some(product) = self.product(id).await? else {
            return Ok(None);
        };

        let mut connection = self.connection.clone();
        let () = pipe()
            .atomic()
            .hdel(&self.products_key, id)
            .ignore()
            .hdel(&self.names_key, &product.name)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(Some(product))
    }
}
