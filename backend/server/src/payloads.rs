//! # Payloads
//!
//! JSON bodies going in and out of the API.
//!
//! ## Patches
//!
//! `*Patch` bodies only touch the fields that were sent. `apply` writes them onto an in-memory
//! copy of the record, the handler then saves the copy. For nullable fields a missing key leaves
//! the value alone while an explicit `null` clears it, see [`double_option`].
use chrono::{DateTime, Utc};
use order::ConsolidatedItem;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{CoffeeOption, Colleague, DrinkType, MilkOption, Role, Size},
    utils::double_option,
};

fn default_true() -> bool {
    true
}

fn default_limit() -> usize {
    20
}

fn default_stats_limit() -> usize {
    10
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
pub struct DrinkTypeCreate {
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Default, Deserialize)]
pub struct DrinkTypePatch {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl DrinkTypePatch {
    pub fn apply(self, item: &mut DrinkType) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(display_order) = self.display_order {
            item.display_order = display_order;
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
    }
}

#[derive(Deserialize)]
pub struct SizeCreate {
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Default, Deserialize)]
pub struct SizePatch {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl SizePatch {
    pub fn apply(self, item: &mut Size) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(abbreviation) = self.abbreviation {
            item.abbreviation = abbreviation;
        }
        if let Some(display_order) = self.display_order {
            item.display_order = display_order;
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
    }
}

#[derive(Deserialize)]
pub struct MilkOptionCreate {
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Default, Deserialize)]
pub struct MilkOptionPatch {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl MilkOptionPatch {
    pub fn apply(self, item: &mut MilkOption) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(display_order) = self.display_order {
            item.display_order = display_order;
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
    }
}

#[derive(Deserialize)]
pub struct ColleagueCreate {
    pub name: String,
    #[serde(default = "default_true")]
    pub usually_in: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Default, Deserialize)]
pub struct ColleaguePatch {
    pub name: Option<String>,
    pub usually_in: Option<bool>,
    pub display_order: Option<i32>,
}

impl ColleaguePatch {
    pub fn apply(self, colleague: &mut Colleague, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            colleague.name = name;
        }
        if let Some(usually_in) = self.usually_in {
            colleague.usually_in = usually_in;
        }
        if let Some(display_order) = self.display_order {
            colleague.display_order = display_order;
        }
        colleague.updated_at = now;
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColleagueResponse {
    pub id: Uuid,
    pub name: String,
    pub usually_in: bool,
    pub display_order: i32,
    pub is_active: bool,
    pub coffee_options: Vec<CoffeeOptionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CoffeeOptionCreate {
    pub drink_type_id: Uuid,
    pub size_id: Uuid,
    #[serde(default)]
    pub milk_option_id: Option<Uuid>,
    #[serde(default)]
    pub sugar: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Default, Deserialize)]
pub struct CoffeeOptionPatch {
    pub drink_type_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub milk_option_id: Option<Option<Uuid>>,
    pub sugar: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub is_default: Option<bool>,
    pub display_order: Option<i32>,
}

impl CoffeeOptionPatch {
    pub fn apply(self, option: &mut CoffeeOption) {
        if let Some(drink_type_id) = self.drink_type_id {
            option.drink_type_id = drink_type_id;
        }
        if let Some(size_id) = self.size_id {
            option.size_id = size_id;
        }
        if let Some(milk_option_id) = self.milk_option_id {
            option.milk_option_id = milk_option_id;
        }
        if let Some(sugar) = self.sugar {
            option.sugar = sugar;
        }
        if let Some(notes) = self.notes {
            option.notes = notes;
        }
        if let Some(is_default) = self.is_default {
            option.is_default = is_default;
        }
        if let Some(display_order) = self.display_order {
            option.display_order = display_order;
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoffeeOptionResponse {
    pub id: Uuid,
    pub colleague_id: Uuid,
    pub drink_type_id: Uuid,
    pub drink_type_name: Option<String>,
    pub size_id: Uuid,
    pub size_name: Option<String>,
    pub size_abbreviation: Option<String>,
    pub milk_option_id: Option<Uuid>,
    pub milk_option_name: Option<String>,
    pub sugar: u32,
    pub notes: Option<String>,
    pub is_default: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub colleague_id: Uuid,
    pub coffee_option_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemCreate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub colleague_id: Uuid,
    pub colleague_name: Option<String>,
    pub coffee_option_id: Uuid,
    pub drink_type_name: String,
    pub size_name: String,
    pub size_abbreviation: String,
    pub milk_option_name: Option<String>,
    pub sugar: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-person lines next to the consolidated pick-up list.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub share_token: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub consolidated: Vec<ConsolidatedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub id: Uuid,
    pub share_token: String,
    pub created_at: DateTime<Utc>,
    pub item_count: usize,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
    #[serde(default = "default_stats_limit")]
    pub limit: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOverview {
    pub total_orders: usize,
    pub total_coffees: usize,
    pub busiest_day: Option<String>,
    pub orders_this_week: usize,
    pub orders_this_month: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkStat {
    pub drink_name: String,
    pub count: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColleagueStat {
    pub colleague_name: String,
    pub order_count: usize,
    pub favourite_drink: Option<String>,
}
