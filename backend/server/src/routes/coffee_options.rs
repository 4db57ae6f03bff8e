use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::put,
};
use uuid::Uuid;

use crate::{
    database::Database,
    error::AppError,
    extract::{AdminUser, AppJson, AppPath},
    menu::Menu,
    models::CoffeeOption,
    payloads::{CoffeeOptionPatch, CoffeeOptionResponse, MessageResponse},
    state::State as AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/coffee-options/{id}",
            put(update_handler).delete(delete_handler),
        )
        .route("/coffee-options/{id}/set-default", put(set_default_handler))
}

/// A colleague's options by `(display_order, created_at)`.
pub async fn options_of(db: &Database, colleague_id: Uuid) -> Result<Vec<CoffeeOption>, AppError> {
    let mut options: Vec<CoffeeOption> = db
        .all::<CoffeeOption>()
        .await?
        .into_iter()
        .filter(|o| o.colleague_id == colleague_id)
        .collect();
    options.sort_by_key(|o| (o.display_order, o.created_at));

    Ok(options)
}

/// Leaves `option` as the colleague's only default.
pub async fn clear_other_defaults(db: &Database, option: &CoffeeOption) -> Result<(), AppError> {
    for mut sibling in options_of(db, option.colleague_id).await? {
        if sibling.id != option.id && sibling.is_default {
            sibling.is_default = false;
            db.save(&sibling).await?;
        }
    }

    Ok(())
}

pub async fn update_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<CoffeeOptionPatch>,
) -> Result<Json<CoffeeOptionResponse>, AppError> {
    let mut option: CoffeeOption = state.db.require(id, "Coffee option").await?;
    let menu = Menu::load(&state.db).await?;

    patch.apply(&mut option);
    menu.resolve(&option)?;

    if option.is_default {
        clear_other_defaults(&state.db, &option).await?;
    }
    state.db.save(&option).await?;

    Ok(Json(menu.describe(&option)))
}

/// Hard delete. Orders keep their snapshot of it.
pub async fn delete_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.remove::<CoffeeOption>(id).await? {
        return Err(AppError::NotFound("Coffee option"));
    }

    Ok(Json(MessageResponse::new("Coffee option deleted")))
}

pub async fn set_default_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CoffeeOptionResponse>, AppError> {
    let mut option: CoffeeOption = state.db.require(id, "Coffee option").await?;

    option.is_default = true;
    clear_other_defaults(&state.db, &option).await?;
    state.db.save(&option).await?;

    Ok(Json(Menu::load(&state.db).await?.describe(&option)))
}
