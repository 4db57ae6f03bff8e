//! # Routes
//!
//! Everything lives under `/api/v1` except the health check.
//!
//! | Prefix | Guard |
//! |---|---|
//! | `/auth` | none, `/auth/me` needs a session |
//! | `/menu`, `/colleagues`, `/coffee-options` | reads need a session, writes need admin |
//! | `/orders` | session, `/orders/share/...` is public |
//! | `/stats` | session |
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::State;

pub mod auth;
pub mod coffee_options;
pub mod colleagues;
pub mod menu;
pub mod orders;
pub mod stats;

pub fn router() -> Router<Arc<State>> {
    let api = Router::new()
        .merge(auth::router())
        .merge(menu::router())
        .merge(colleagues::router())
        .merge(coffee_options::router())
        .merge(orders::router())
        .merge(stats::router());

    Router::new()
        .nest("/api/v1", api)
        .route("/api/health", get(health_handler))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
