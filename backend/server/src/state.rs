use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::{config::Config, database::connect, seed::seed_if_empty, store::Store};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let store = connect(&config.database_url).await?;

        if config.seed_on_start {
            if let Some(seeded) = seed_if_empty(store.as_ref()).await? {
                info!("Seeded {} categories on start", seeded.len());
            }
        }

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
