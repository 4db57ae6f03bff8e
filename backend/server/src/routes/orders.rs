use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use order::summary_text;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Table,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery, CurrentUser},
    models::Order,
    orders::{SHARE_TOKEN_BYTES, find_shared, list_page, render, snapshot_items},
    payloads::{ListQuery, OrderCreate, OrderListResponse, OrderResponse},
    state::State as AppState,
    utils::random_token,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_handler).post(create_handler))
        .route("/orders/share/{token}", get(shared_handler))
        .route("/orders/share/{token}/summary", get(shared_summary_handler))
        .route("/orders/{id}", get(get_handler).put(update_handler))
        .route("/orders/{id}/summary", get(summary_handler))
}

fn plain_text(response: OrderResponse) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        summary_text(&response.consolidated),
    )
}

pub async fn create_handler(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<OrderCreate>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let items = snapshot_items(&state.db, id, &payload.items, now).await?;

    let order = Order {
        id,
        share_token: random_token(SHARE_TOKEN_BYTES),
        created_by: user.id,
        created_at: now,
        items,
    };

    state.db.save(&order).await?;
    state
        .db
        .link(Table::ShareTokens, &order.share_token, order.id)
        .await?;

    info!("{} placed order {} with {} items", user.email, order.id, order.items.len());

    Ok((StatusCode::CREATED, Json(render(&state.db, order).await?)))
}

pub async fn list_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<OrderListResponse>>, AppError> {
    let orders = state.db.all::<Order>().await?;

    Ok(Json(list_page(orders, query.skip, query.limit)))
}

pub async fn get_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.db.require(id, "Order").await?;

    Ok(Json(render(&state.db, order).await?))
}

/// Public, the share token is the credential.
pub async fn shared_handler(
    State(state): State<Arc<AppState>>,
    AppPath(token): AppPath<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = find_shared(&state.db, &token).await?;

    Ok(Json(render(&state.db, order).await?))
}

/// Replaces every item. Nothing is written unless all of them resolve.
pub async fn update_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<OrderCreate>,
) -> Result<Json<OrderResponse>, AppError> {
    let mut order: Order = state.db.require(id, "Order").await?;

    order.items = snapshot_items(&state.db, order.id, &payload.items, Utc::now()).await?;
    state.db.save(&order).await?;

    Ok(Json(render(&state.db, order).await?))
}

pub async fn summary_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.db.require(id, "Order").await?;

    Ok(plain_text(render(&state.db, order).await?))
}

pub async fn shared_summary_handler(
    State(state): State<Arc<AppState>>,
    AppPath(token): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = find_shared(&state.db, &token).await?;

    Ok(plain_text(render(&state.db, order).await?))
}
