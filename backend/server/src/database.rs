//! # Database
//!
//! Selects and connects the document store from a single connection string.
//!
//! ## Schemes
//!
//! - `redis://` / `rediss://`: Redis, see [`RedisStore`] for the key layout
//! - `memory://`: in-process collections, lost on exit
//!
//! ## Redis
//!
//! - One hash per collection keeps documents compact and lookups O(1)
//! - Listings scan the product hash and filter in process, fine for inventory-sized data
//! - Name uniqueness rides on `HSETNX`, Redis runs it atomically
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use redis::{
    Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::store::{MemoryStore, RedisStore, Store, redis::DEFAULT_PREFIX};

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url).context("invalid redis url")?;
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .context("failed to connect to redis")?;

    Ok(connection_manager)
}

pub async fn connect(database_url: &str) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match database_url.split_once("://") {
        Some(("memory", _)) => Arc::new(MemoryStore::new()),
        Some(("redis" | "rediss", _)) => {
            let connection = init_redis(database_url).await?;
            Arc::new(RedisStore::new(connection, DEFAULT_PREFIX))
        }
        _ => bail!("Unsupported DATABASE_URL scheme: {database_url}"),
    };

    info!("Connected {} store", store.backend_tag());

    Ok(store)
}
