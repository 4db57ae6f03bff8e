//! # Records
//!
//! Everything persisted, one JSON document per record. Records are fully materialized values,
//! relations are plain ids resolved by the handler that needs them.
//!
//! Order items snapshot the menu names at write time, so renaming a drink later does not rewrite
//! old orders.
use chrono::{DateTime, Utc};
use order::OrderLine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Only the hash of the emailed token is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagicLinkToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colleague {
    pub id: Uuid,
    pub name: String,
    pub usually_in: bool,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A colleague's saved drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeOption {
    pub id: Uuid,
    pub colleague_id: Uuid,
    pub drink_type_id: Uuid,
    pub size_id: Uuid,
    pub milk_option_id: Option<Uuid>,
    pub sugar: u32,
    pub notes: Option<String>,
    pub is_default: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkType {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Size {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilkOption {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub share_token: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub colleague_id: Uuid,
    pub coffee_option_id: Uuid,
    pub drink_type_name: String,
    pub size_name: String,
    pub size_abbreviation: String,
    pub milk_option_name: Option<String>,
    pub sugar: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn line(&self) -> OrderLine {
        OrderLine {
            drink_type_name: self.drink_type_name.clone(),
            size_name: self.size_name.clone(),
            size_abbreviation: self.size_abbreviation.clone(),
            milk_option_name: self.milk_option_name.clone(),
            sugar: self.sugar,
            notes: self.notes.clone(),
        }
    }
}

impl Record for User {
    const TABLE: Table = Table::Users;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for MagicLinkToken {
    const TABLE: Table = Table::MagicTokens;

    fn key(&self) -> String {
        self.token_hash.clone()
    }
}

impl Record for Colleague {
    const TABLE: Table = Table::Colleagues;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for CoffeeOption {
    const TABLE: Table = Table::CoffeeOptions;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for DrinkType {
    const TABLE: Table = Table::DrinkTypes;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Size {
    const TABLE: Table = Table::Sizes;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for MilkOption {
    const TABLE: Table = Table::MilkOptions;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Order {
    const TABLE: Table = Table::Orders;

    fn key(&self) -> String {
        self.id.to_string()
    }
}
