use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{AdminUser, AppJson, AppPath, CurrentUser},
    menu::Menu,
    models::{CoffeeOption, Colleague},
    payloads::{
        CoffeeOptionCreate, CoffeeOptionResponse, ColleagueCreate, ColleaguePatch,
        ColleagueResponse, MessageResponse,
    },
    routes::coffee_options::{clear_other_defaults, options_of},
    state::State as AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/colleagues", get(list_handler).post(create_handler))
        .route("/colleagues/{id}", put(update_handler).delete(delete_handler))
        .route("/colleagues/{id}/coffee-options", post(add_option_handler))
}

fn colleague_response(
    colleague: Colleague,
    options: &[CoffeeOption],
    menu: &Menu,
) -> ColleagueResponse {
    ColleagueResponse {
        id: colleague.id,
        name: colleague.name,
        usually_in: colleague.usually_in,
        display_order: colleague.display_order,
        is_active: colleague.is_active,
        coffee_options: options.iter().map(|o| menu.describe(o)).collect(),
        created_at: colleague.created_at,
        updated_at: colleague.updated_at,
    }
}

async fn render(state: &AppState, colleague: Colleague) -> Result<ColleagueResponse, AppError> {
    let menu = Menu::load(&state.db).await?;
    let options = options_of(&state.db, colleague.id).await?;

    Ok(colleague_response(colleague, &options, &menu))
}

/// Active colleagues by `(display_order, name)`, each with their saved drinks.
pub async fn list_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ColleagueResponse>>, AppError> {
    let menu = Menu::load(&state.db).await?;

    let mut options: HashMap<Uuid, Vec<CoffeeOption>> = HashMap::new();
    for option in state.db.all::<CoffeeOption>().await? {
        options.entry(option.colleague_id).or_default().push(option);
    }
    for list in options.values_mut() {
        list.sort_by_key(|o| (o.display_order, o.created_at));
    }

    let mut colleagues: Vec<Colleague> = state
        .db
        .all::<Colleague>()
        .await?
        .into_iter()
        .filter(|c| c.is_active)
        .collect();
    colleagues.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(Json(
        colleagues
            .into_iter()
            .map(|colleague| {
                let own = options.get(&colleague.id).map(Vec::as_slice).unwrap_or_default();
                colleague_response(colleague, own, &menu)
            })
            .collect(),
    ))
}

pub async fn create_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<ColleagueCreate>,
) -> Result<(StatusCode, Json<ColleagueResponse>), AppError> {
    let now = Utc::now();
    let colleague = Colleague {
        id: Uuid::new_v4(),
        name: payload.name,
        usually_in: payload.usually_in,
        display_order: payload.display_order,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    state.db.save(&colleague).await?;
    info!("Added colleague {}", colleague.name);

    Ok((StatusCode::CREATED, Json(render(&state, colleague).await?)))
}

pub async fn update_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<ColleaguePatch>,
) -> Result<Json<ColleagueResponse>, AppError> {
    let mut colleague: Colleague = state.db.require(id, "Colleague").await?;

    patch.apply(&mut colleague, Utc::now());
    state.db.save(&colleague).await?;

    Ok(Json(render(&state, colleague).await?))
}

/// Deactivated colleagues keep their past order items.
pub async fn delete_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut colleague: Colleague = state.db.require(id, "Colleague").await?;

    colleague.is_active = false;
    colleague.updated_at = Utc::now();
    state.db.save(&colleague).await?;

    Ok(Json(MessageResponse::new("Colleague deactivated")))
}

/// A colleague's first option is always their default.
pub async fn add_option_handler(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CoffeeOptionCreate>,
) -> Result<(StatusCode, Json<CoffeeOptionResponse>), AppError> {
    let colleague: Colleague = state.db.require(id, "Colleague").await?;
    let menu = Menu::load(&state.db).await?;
    let first = options_of(&state.db, colleague.id).await?.is_empty();

    let option = CoffeeOption {
        id: Uuid::new_v4(),
        colleague_id: colleague.id,
        drink_type_id: payload.drink_type_id,
        size_id: payload.size_id,
        milk_option_id: payload.milk_option_id,
        sugar: payload.sugar,
        notes: payload.notes,
        is_default: payload.is_default || first,
        display_order: payload.display_order,
        created_at: Utc::now(),
    };
    menu.resolve(&option)?;

    if option.is_default {
        clear_other_defaults(&state.db, &option).await?;
    }
    state.db.save(&option).await?;

    Ok((StatusCode::CREATED, Json(menu.describe(&option))))
}
