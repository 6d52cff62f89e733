use catalog::Category;
use tracing::info;
use uuid::Uuid;

use crate::store::{Store, StoreError};

pub const CATEGORIES: [(&str, &str); 6] = [
    ("Electronics", "Electronic devices and gadgets"),
    ("Clothing", "Apparel and fashion items"),
    ("Books", "Books and reading materials"),
    ("Home & Garden", "Home and garden products"),
    ("Sports", "Sports equipment and accessories"),
    ("Toys", "Toys and games"),
];

/// Replaces every stored category with the fixed set, under fresh ids.
pub async fn seed_categories(store: &dyn Store) -> Result<Vec<Category>, StoreError> {
    let categories: Vec<Category> = CATEGORIES
        .iter()
        .map(|(name, description)| Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();

    store.replace_categories(&categories).await?;
    info!("Seeded {} categories", categories.len());

    Ok(categories)
}

/// Seeds only when the category collection is empty.
pub async fn seed_if_empty(store: &dyn Store) -> Result<Option<Vec<Category>>, StoreError> {
    if !store.categories().await?.is_empty() {
        return Ok(None);
    }

    seed_categories(store).await.map(Some)
}
