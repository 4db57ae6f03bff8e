use std::collections::HashMap;

use chrono::{DateTime, Utc};
use order::{OrderLine, consolidate};
use uuid::Uuid;

use crate::{
    database::{Database, Table},
    error::AppError,
    menu::Menu,
    models::{CoffeeOption, Colleague, Order, OrderItem},
    payloads::{OrderItemCreate, OrderItemResponse, OrderListResponse, OrderResponse},
};

/// Share tokens are 64 random bytes.
pub const SHARE_TOKEN_BYTES: usize = 64;

/// Copies each requested coffee option's current names into new order items, in request order.
///
/// Fails on the first option or menu row that no longer exists.
pub async fn snapshot_items(
    db: &Database,
    order_id: Uuid,
    requests: &[OrderItemCreate],
    now: DateTime<Utc>,
) -> Result<Vec<OrderItem>, AppError> {
    let menu = Menu::load(db).await?;
    let mut items = Vec::with_capacity(requests.len());

    for request in requests {
        let option = db
            .fetch::<CoffeeOption>(request.coffee_option_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Coffee option {} not found",
                    request.coffee_option_id
                ))
            })?;

        let drink = menu.resolve(&option)?;

        items.push(OrderItem {
            id: Uuid::new_v4(),
            order_id,
            colleague_id: request.colleague_id,
            coffee_option_id: option.id,
            drink_type_name: drink.drink_type_name,
            size_name: drink.size_name,
            size_abbreviation: drink.size_abbreviation,
            milk_option_name: drink.milk_option_name,
            sugar: option.sugar,
            notes: option.notes,
            created_at: now,
        });
    }

    Ok(items)
}

pub async fn colleague_names(db: &Database) -> Result<HashMap<Uuid, String>, AppError> {
    Ok(db
        .all::<Colleague>()
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

pub async fn find_shared(db: &Database, share_token: &str) -> Result<Order, AppError> {
    let order_id = db
        .lookup(Table::ShareTokens, share_token)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    db.require(order_id, "Order").await
}

pub async fn render(db: &Database, order: Order) -> Result<OrderResponse, AppError> {
    Ok(order_response(order, &colleague_names(db).await?))
}

/// The consolidated list is rebuilt from the stored items on every call.
pub fn order_response(order: Order, colleague_names: &HashMap<Uuid, String>) -> OrderResponse {
    let lines: Vec<OrderLine> = order.items.iter().map(OrderItem::line).collect();
    let consolidated = consolidate(&lines);

    let items = order
        .items
        .into_iter()
        .map(|item| OrderItemResponse {
            colleague_name: colleague_names.get(&item.colleague_id).cloned(),
            id: item.id,
            order_id: item.order_id,
            colleague_id: item.colleague_id,
            coffee_option_id: item.coffee_option_id,
            drink_type_name: item.drink_type_name,
            size_name: item.size_name,
            size_abbreviation: item.size_abbreviation,
            milk_option_name: item.milk_option_name,
            sugar: item.sugar,
            notes: item.notes,
            created_at: item.created_at,
        })
        .collect();

    OrderResponse {
        id: order.id,
        share_token: order.share_token,
        created_by: order.created_by,
        created_at: order.created_at,
        items,
        consolidated,
    }
}

/// Newest first.
pub fn list_page(mut orders: Vec<Order>, skip: usize, limit: usize) -> Vec<OrderListResponse> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    orders
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|order| OrderListResponse {
            id: order.id,
            share_token: order.share_token,
            created_at: order.created_at,
            item_count: order.items.len(),
        })
        .collect()
}
