//! # Products
//!
//! Read/write access to the product collection.
//!
//! Writes run in this order: payload rules, name uniqueness, category references, store.
//! The uniqueness pre-check gives the early answer, the store's unique name index settles
//! races between concurrent writers.
use std::collections::HashMap;

use catalog::{NewProduct, Pagination, Product, ProductPage, ProductPatch, ProductQuery, ProductView};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    categories,
    error::AppError,
    search::{ProductFilter, Window},
    store::Store,
};

pub async fn create(store: &dyn Store, input: NewProduct) -> Result<ProductView, AppError> {
    if store.product_by_name(&input.name).await?.is_some() {
        return Err(AppError::Conflict);
    }

    categories::ensure_exist(store, &input.categories).await?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        quantity: input.quantity,
        categories: input.categories,
        created_at: now,
        updated_at: now,
    };

    store.insert_product(&product).await?;
    info!(id = %product.id, name = %product.name, "Product created");

    resolve(store, product).await
}

pub async fn list(store: &dyn Store, query: &ProductQuery) -> Result<ProductPage, AppError> {
    let filter = ProductFilter::from(query);

    let total = store.count_products(&filter).await?;
    let pagination = Pagination::new(query.page, query.limit, total);

    let window = Window {
        skip: pagination.offset(),
        limit: pagination.items_per_page as u64,
    };
    let products = store.find_products(&filter, window).await?;

    let lookup = categories::lookup(store).await?;
    let products = products
        .into_iter()
        .map(|p| ProductView::project(p, &lookup))
        .collect();

    Ok(ProductPage {
        products,
        pagination,
    })
}

pub async fn get_by_id(store: &dyn Store, id: &str) -> Result<ProductView, AppError> {
    let product = find(store, id).await?;

    resolve(store, product).await
}

pub async fn update(store: &dyn Store, id: &str, patch: ProductPatch) -> Result<ProductView, AppError> {
    let mut product = find(store, id).await?;

    if let Some(name) = &patch.name {
        if name != &product.name && store.product_by_name(name).await?.is_some() {
            return Err(AppError::Conflict);
        }
    }

    if let Some(ids) = &patch.categories {
        categories::ensure_exist(store, ids).await?;
    }

    let previous_name = product.name.clone();
    apply(&mut product, patch);
    product.updated_at = Utc::now();

    store.save_product(&previous_name, &product).await?;
    info!(id = %product.id, "Product updated");

    resolve(store, product).await
}

pub async fn delete(store: &dyn Store, id: &str) -> Result<ProductView, AppError> {
    let removed = store
        .delete_product(id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    info!(id = %removed.id, name = %removed.name, "Product deleted");

    resolve(store, removed).await
}

fn apply(product: &mut Product, patch: ProductPatch) {
    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(description) = patch.description {
        product.description = description;
    }
    if let Some(quantity) = patch.quantity {
        product.quantity = quantity;
    }
    if let Some(categories) = patch.categories {
        product.categories = categories;
    }
}

async fn find(store: &dyn Store, id: &str) -> Result<Product, AppError> {
    store
        .product(id)
        .await?
        .ok_or(AppError::NotFound("Product"))
}

async fn resolve(store: &dyn Store, product: Product) -> Result<ProductView, AppError> {
    let referenced = store.find_categories(&product.categories).await?;
    let lookup: HashMap<_, _> = referenced.into_iter().map(|c| (c.id.clone(), c)).collect();

    Ok(ProductView::project(product, &lookup))
}
