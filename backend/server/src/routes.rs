use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
};
use catalog::{Category, Envelope, ProductPage, ProductPayload, ProductQuery, ProductView, RawProductQuery};

use crate::{categories, error::AppError, products, state::State, utils::get_payload};

type AppState = AxumState<Arc<State>>;
type Reply<T> = Result<Json<Envelope<T>>, AppError>;

pub async fn health_handler() -> Json<Envelope<()>> {
    Json(Envelope::message("Server is running"))
}

pub async fn not_found_handler() -> AppError {
    AppError::RouteNotFound
}

pub async fn create_product_handler(
    AxumState(state): AppState,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<ProductView>>), AppError> {
    let input = get_payload(body)?
        .into_new_product()
        .map_err(AppError::Validation)?;

    let product = products::create(state.store.as_ref(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(product).with_message("Product created successfully")),
    ))
}

pub async fn list_products_handler(
    AxumState(state): AppState,
    Query(raw): Query<RawProductQuery>,
) -> Reply<ProductPage> {
    let query = ProductQuery::from(raw);
    let page = products::list(state.store.as_ref(), &query).await?;

    Ok(Json(Envelope::ok(page)))
}

pub async fn get_product_handler(AxumState(state): AppState, Path(id): Path<String>) -> Reply<ProductView> {
    let product = products::get_by_id(state.store.as_ref(), &id).await?;

    Ok(Json(Envelope::ok(product)))
}

pub async fn update_product_handler(
    AxumState(state): AppState,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Reply<ProductView> {
    let patch = get_payload(body)?
        .into_patch()
        .map_err(AppError::Validation)?;

    let product = products::update(state.store.as_ref(), &id, patch).await?;

    Ok(Json(
        Envelope::ok(product).with_message("Product updated successfully"),
    ))
}

pub async fn delete_product_handler(
    AxumState(state): AppState,
    Path(id): Path<String>,
) -> Reply<ProductView> {
    let removed = products::delete(state.store.as_ref(), &id).await?;

    Ok(Json(
        Envelope::ok(removed).with_message("Product deleted successfully"),
    ))
}

pub async fn list_categories_handler(AxumState(state): AppState) -> Reply<Vec<Category>> {
    let categories = categories::list_all(state.store.as_ref()).await?;

    Ok(Json(Envelope::ok(categories)))
}

pub async fn get_category_handler(AxumState(state): AppState, Path(id): Path<String>) -> Reply<Category> {
    let category = categories::get_by_id(state.store.as_ref(), &id).await?;

    Ok(Json(Envelope::ok(category)))
}
