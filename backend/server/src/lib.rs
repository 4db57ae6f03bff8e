//! Backend of CoffeeRun, an office coffee-run organizer.
//!
//! One person collects everyone's drinks, the server turns the per-person list into the shortest
//! thing to read out at the counter.
//!
//!
//!
//! # General Infrastructure
//! - Single axum binary, all state in Redis
//! - Frontend is served elsewhere, talks to `/api/v1` with a session cookie
//! - Shared order links work without an account
//!
//!
//!
//! # Data
//!
//! **Goal**: Orders never change when the menu does.
//!
//! - Admins curate drink types, sizes and milk options, deleting only deactivates them
//! - Colleagues have saved coffee options, one of them is their default
//! - Placing an order copies the names out of each coffee option into the order item
//! - The consolidated pick-up list is recomputed from the items on every read, see the `order`
//!   crate
//!
//!
//!
//! # Notes
//!
//! ## Redis
//! One hash per record kind, `coffee:<kind>`, field = id, value = JSON. Secondary lookups (email to
//! user, share token to order) are their own hashes. Listing reads the whole hash, which is fine
//! for an office worth of data.
//!
//! `STORE=memory` swaps Redis for an in-process map, handy for local runs and tests.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p coffee
//! ```
//!
//! Seed the default menu.
//! ```sh
//! cargo run -p seed -- --redis-url redis://127.0.0.1:6379
//! ```
//!
//! Without Redis.
//! ```sh
//! STORE=memory RUST_LOG=debug cargo run -p coffee
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod extract;
pub mod menu;
pub mod models;
pub mod orders;
pub mod payloads;
pub mod routes;
pub mod state;
pub mod stats;
pub mod utils;

use config::Config;
use error::AppError;
use state::State;

/// The full router with CORS and request tracing, ready to serve.
pub fn app(state: Arc<State>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping invalid CORS origin {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install signal handler: {e}");
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
