use std::collections::HashMap;

use catalog::Category;

use crate::{error::AppError, store::Store};

/// Every category, ascending by name.
pub async fn list_all(store: &dyn Store) -> Result<Vec<Category>, AppError> {
    let mut categories = store.categories().await?;
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(categories)
}

pub async fn get_by_id(store: &dyn Store, id: &str) -> Result<Category, AppError> {
    store
        .category(id)
        .await?
        .ok_or(AppError::NotFound("Category"))
}

/// Id → category map used to resolve product references for responses.
pub async fn lookup(store: &dyn Store) -> Result<HashMap<String, Category>, AppError> {
    Ok(store
        .categories()
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect())
}

/// Fails unless every id names an existing category.
pub async fn ensure_exist(store: &dyn Store, ids: &[String]) -> Result<(), AppError> {
    let found = store.find_categories(ids).await?;

    let all_found = ids.iter().all(|id| found.iter().any(|c| &c.id == id));
    if !all_found {
        return Err(AppError::InvalidCategories);
    }

    Ok(())
}
