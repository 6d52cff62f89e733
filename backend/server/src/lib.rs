//! Documentation of the product inventory service.
//!
//!
//!
//! # General Infrastructure
//! - Browser or CLI client talks JSON to this server under `/api`
//! - Handlers validate product bodies, then call the access layer ([`products`], [`categories`])
//! - The access layer reads and writes a document [`store`] selected by `DATABASE_URL`
//! - Responses are always a [`catalog::Envelope`], errors included
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | POST | `/api/products` | 201 created product |
//! | GET | `/api/products?page&limit&search&categories` | 200 page of products + pagination |
//! | GET | `/api/products/{id}` | 200 product |
//! | PUT | `/api/products/{id}` | 200 updated product |
//! | DELETE | `/api/products/{id}` | 200 removed product |
//! | GET | `/api/categories` | 200 categories by name |
//! | GET | `/api/categories/{id}` | 200 category |
//! | GET | `/api/health` | 200 |
//!
//!
//!
//! # Notes
//!
//! ## Name uniqueness
//! The access layer checks for an existing name before writing, which answers the common
//! case. Two concurrent creates can both pass that check, so the store also claims names
//! atomically and the loser gets the same conflict response.
//!
//! ## Category references
//! Products keep category ids only. Each response resolves them at read time, so a renamed
//! category never leaves stale copies behind. Categories cannot be deleted over HTTP, so
//! dangling ids only appear if the seeder is rerun; they are dropped from responses.
//!
//!
//!
//! # Setup
//!
//! Seed categories (destructive).
//! ```sh
//! DATABASE_URL=redis://127.0.0.1:6379 cargo run -p seed
//! ```
//!
//! Start the server.
//! ```sh
//! RUST_LOG=info DATABASE_URL=redis://127.0.0.1:6379 cargo run -p backend
//! ```
//!
//! Run against the in-memory store, seeding on start.
//! ```sh
//! DATABASE_URL=memory:// SEED_ON_START=true cargo run -p backend
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod categories;
pub mod config;
pub mod database;
pub mod error;
pub mod products;
pub mod routes;
pub mod search;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

use config::Config;
use routes::{
    create_product_handler, delete_product_handler, get_category_handler, get_product_handler,
    health_handler, list_categories_handler, list_products_handler, not_found_handler,
    update_product_handler,
};
use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(state.config.cors_max_age_secs));

    let api = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/categories", get(list_categories_handler))
        .route("/categories/{id}", get(get_category_handler));

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<State>, listener: TcpListener) -> Result<()> {
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    serve(state, listener).await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
