use std::collections::HashMap;

use async_trait::async_trait;
use catalog::{Category, Product};
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::search::{ProductFilter, Window, select};

#[derive(Default)]
struct Collections {
    categories: HashMap<String, Category>,
    products: HashMap<String, Product>,
    product_names: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.inner.read().await.categories.values().cloned().collect())
    }

    async fn category(&self, id: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.inner.read().await.categories.get(id).cloned())
    }

    async fn find_categories(&self, ids: &[String]) -> Result<Vec<Category>, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .categories
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn replace_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        inner.categories = categories
            .iter()
            .map(|c| (c.id.clone(), c.clone()))
            .collect();

        Ok(())
    }

    async fn product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().await.products.get(id).cloned())
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .product_names
            .get(name)
            .and_then(|id| inner.products.get(id))
            .cloned())
    }

    async fn find_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read().await;

        Ok(select(inner.products.values().cloned(), filter, window))
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner.products.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.product_names.contains_key(&product.name) {
            return Err(StoreError::DuplicateName(product.name.clone()));
        }

        inner
            .product_names
            .insert(product.name.clone(), product.id.clone());
        inner.products.insert(product.id.clone(), product.clone());

        Ok(())
    }

    async fn save_product(&self, previous_name: &str, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if previous_name != product.name {
            match inner.product_names.get(&product.name) {
                Some(owner) if owner != &product.id => {
                    return Err(StoreError::DuplicateName(product.name.clone()));
                }
                _ => {}
            }

            inner.product_names.remove(previous_name);
            inner
                .product_names
                .insert(product.name.clone(), product.id.clone());
        }

        inner.products.insert(product.id.clone(), product.clone());

        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let mut inner = self.inner.write().await;

        let removed = inner.products.remove(id);
        if let Some(product) = &removed {
            inner.product_names.remove(&product.name);
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        let now = Utc::now();

        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "A description that is long".to_string(),
            quantity: 1,
            categories: vec!["c1".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name() {
        let store = MemoryStore::new();
        store.insert_product(&product("1", "Atlas")).await.unwrap();

        let err = store.insert_product(&product("2", "Atlas")).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateName(name) if name == "Atlas"));
        assert_eq!(store.count_products(&ProductFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let store = MemoryStore::new();
        store.insert_product(&product("1", "Atlas")).await.unwrap();

        store.insert_product(&product("2", "atlas")).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_releases_old_name() {
        let store = MemoryStore::new();
        store.insert_product(&product("1", "Atlas")).await.unwrap();
        store.insert_product(&product("2", "Globe")).await.unwrap();

        let renamed = product("1", "Compass");
        store.save_product("Atlas", &renamed).await.unwrap();

        assert!(store.product_by_name("Atlas").await.unwrap().is_none());
        assert_eq!(store.product_by_name("Compass").await.unwrap().unwrap().id, "1");

        let clash = product("1", "Globe");
        assert!(matches!(
            store.save_product("Compass", &clash).await,
            Err(StoreError::DuplicateName(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_and_frees_name() {
        let store = MemoryStore::new();
        store.insert_product(&product("1", "Atlas")).await.unwrap();

        let removed = store.delete_product("1").await.unwrap().unwrap();

        assert_eq!(removed.name, "Atlas");
        assert!(store.product("1").await.unwrap().is_none());
        assert!(store.delete_product("1").await.unwrap().is_none());
        store.insert_product(&product("2", "Atlas")).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_categories_drops_previous() {
        let store = MemoryStore::new();
        let old = Category {
            id: "old".to_string(),
            name: "Old".to_string(),
            description: "Gone soon".to_string(),
        };
        let new = Category {
            id: "new".to_string(),
            name: "New".to_string(),
            description: "Here to stay".to_string(),
        };

        store.replace_categories(&[old]).await.unwrap();
        store.replace_categories(&[new.clone()]).await.unwrap();

        assert_eq!(store.categories().await.unwrap(), [new.clone()]);
        assert_eq!(
            store
                .find_categories(&["new".to_string(), "old".to_string()])
                .await
                .unwrap(),
            [new]
        );
    }
}
