use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::Utc;

use crate::{
    error::AppError,
    extract::{AppQuery, CurrentUser},
    models::Order,
    orders::colleague_names,
    payloads::{ColleagueStat, DrinkStat, StatsOverview, StatsQuery},
    state::State as AppState,
    stats::{colleagues, drinks, overview, within},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats/overview", get(overview_handler))
        .route("/stats/drinks", get(drinks_handler))
        .route("/stats/colleagues", get(colleagues_handler))
}

pub async fn overview_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<StatsOverview>, AppError> {
    let orders = state.db.all::<Order>().await?;

    Ok(Json(overview(&orders, query.days, Utc::now())))
}

pub async fn drinks_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<Vec<DrinkStat>>, AppError> {
    let orders = state.db.all::<Order>().await?;
    let window = within(&orders, query.days, Utc::now());

    Ok(Json(drinks(&window, query.limit)))
}

pub async fn colleagues_handler(
    _: CurrentUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<Vec<ColleagueStat>>, AppError> {
    let orders = state.db.all::<Order>().await?;
    let names = colleague_names(&state.db).await?;
    let window = within(&orders, query.days, Utc::now());

    Ok(Json(colleagues(&window, &names)))
}
