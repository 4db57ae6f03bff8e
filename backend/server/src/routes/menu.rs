use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{AdminUser, AppJson, AppPath, CurrentUser},
    menu::{MenuItem, active_sorted},
    models::{DrinkType, MilkOption, Size},
    payloads::MessageResponse,
    state::State as AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    let router = Router::new();
    let router = routes::<DrinkType>(router, "/menu/drink-types");
    let router = routes::<Size>(router, "/menu/sizes");

    routes::<MilkOption>(router, "/menu/milk-options")
}

fn routes<T: MenuItem>(router: Router<Arc<AppState>>, path: &str) -> Router<Arc<AppState>> {
    router
        .route(path, get(list_handler::<T>).post(create_handler::<T>))
        .route(
            &format!("{path}/{{id}}"),
            put(update_handler::<T>).delete(delete_handler::<T>),
        )
}

pub async fn list_handler<T: MenuItem>(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<T>>, AppError> {
    Ok(Json(active_sorted(state.db.all::<T>().await?)))
}

pub async fn create_handler<T: MenuItem>(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<T::Create>,
) -> Result<(StatusCode, Json<T>), AppError> {
    let item = T::create(payload);
    state.db.save(&item).await?;

    info!("Created {} {}", T::LABEL.to_lowercase(), item.name());

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_handler<T: MenuItem>(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<T::Patch>,
) -> Result<Json<T>, AppError> {
    let mut item: T = state.db.require(id, T::LABEL).await?;

    item.apply(patch);
    state.db.save(&item).await?;

    Ok(Json(item))
}

/// Soft delete, existing coffee options and orders keep resolving the name.
pub async fn delete_handler<T: MenuItem>(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut item: T = state.db.require(id, T::LABEL).await?;

    item.deactivate();
    state.db.save(&item).await?;

    Ok(Json(MessageResponse::new(format!("{} deactivated", T::LABEL))))
}
