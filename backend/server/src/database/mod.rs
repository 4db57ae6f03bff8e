//! # Redis
//!
//! Small dataset, a handful of admins and a few dozen colleagues. Every table is one Redis hash:
//!
//! - Key: `coffee:<table>`
//! - Field: record key, usually the uuid
//! - Value: the record as JSON
//!
//! Lookups by id are O(1) `HGET`s. Listing a table is one `HVALS`, sorting and filtering happen in
//! the handler.
//!
//! ## Index tables
//!
//! - `coffee:user_emails`: lowercase email to user id
//! - `coffee:share_tokens`: share token to order id
//!
//! ## Single use
//!
//! Magic link tokens are read and deleted in one `MULTI` block ([`Store::take`]), so two requests
//! racing with the same link cannot both log in.
use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::AppError;

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    UserEmails,
    MagicTokens,
    Colleagues,
    CoffeeOptions,
    DrinkTypes,
    Sizes,
    MilkOptions,
    Orders,
    ShareTokens,
}

impl Table {
    pub fn key(self) -> &'static str {
        match self {
            Table::Users => "coffee:users",
            Table::UserEmails => "coffee:user_emails",
            Table::MagicTokens => "coffee:magic_tokens",
            Table::Colleagues => "coffee:colleagues",
            Table::CoffeeOptions => "coffee:coffee_options",
            Table::DrinkTypes => "coffee:drink_types",
            Table::Sizes => "coffee:sizes",
            Table::MilkOptions => "coffee:milk_options",
            Table::Orders => "coffee:orders",
            Table::ShareTokens => "coffee:share_tokens",
        }
    }
}

/// Raw key-value access, one hash per [`Table`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, table: Table, key: &str) -> Result<Option<String>, AppError>;

    async fn put(&self, table: Table, key: &str, value: String) -> Result<(), AppError>;

    async fn delete(&self, table: Table, key: &str) -> Result<bool, AppError>;

    async fn values(&self, table: Table) -> Result<Vec<String>, AppError>;

    /// Atomic get and delete.
    async fn take(&self, table: Table, key: &str) -> Result<Option<String>, AppError>;
}

pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: Table;

    fn key(&self) -> String;
}

/// Typed access on top of a [`Store`].
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn Store>,
}

impl Database {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn fetch<R: Record>(&self, key: impl Display) -> Result<Option<R>, AppError> {
        self.store
            .get(R::TABLE, &key.to_string())
            .await?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(AppError::from)
    }

    /// Like [`Database::fetch`] but a missing record is a 404 naming `what`.
    pub async fn require<R: Record>(
        &self,
        key: impl Display,
        what: &'static str,
    ) -> Result<R, AppError> {
        self.fetch(key).await?.ok_or(AppError::NotFound(what))
    }

    pub async fn save<R: Record>(&self, record: &R) -> Result<(), AppError> {
        let json = serde_json::to_string(record)?;

        self.store.put(R::TABLE, &record.key(), json).await
    }

    pub async fn remove<R: Record>(&self, key: impl Display) -> Result<bool, AppError> {
        self.store.delete(R::TABLE, &key.to_string()).await
    }

    pub async fn take<R: Record>(&self, key: impl Display) -> Result<Option<R>, AppError> {
        self.store
            .take(R::TABLE, &key.to_string())
            .await?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn all<R: Record>(&self) -> Result<Vec<R>, AppError> {
        self.store
            .values(R::TABLE)
            .await?
            .iter()
            .map(|json| serde_json::from_str(json).map_err(AppError::from))
            .collect()
    }

    pub async fn lookup(&self, table: Table, key: &str) -> Result<Option<Uuid>, AppError> {
        self.store
            .get(table, key)
            .await?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn link(&self, table: Table, key: &str, id: Uuid) -> Result<(), AppError> {
        self.store.put(table, key, serde_json::to_string(&id)?).await
    }

    pub async fn is_empty<R: Record>(&self) -> Result<bool, AppError> {
        Ok(self.store.values(R::TABLE).await?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Colleague, MagicLinkToken};

    fn database() -> Database {
        Database::new(Arc::new(MemoryStore::default()))
    }

    fn colleague(name: &str) -> Colleague {
        Colleague {
            id: Uuid::new_v4(),
            name: name.to_string(),
            usually_in: true,
            display_order: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_fetch_remove() {
        let db = database();
        let alice = colleague("Alice");
        db.save(&alice).await.unwrap();

        let fetched: Colleague = db.fetch(alice.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");

        assert!(db.remove::<Colleague>(alice.id).await.unwrap());
        assert!(db.fetch::<Colleague>(alice.id).await.unwrap().is_none());
        assert!(!db.remove::<Colleague>(alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_require_missing() {
        let err = database()
            .require::<Colleague>(Uuid::new_v4(), "Colleague")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Colleague not found");
    }

    #[tokio::test]
    async fn test_all_keeps_insertion_order() {
        let db = database();
        for name in ["Alice", "Bob", "Carol"] {
            db.save(&colleague(name)).await.unwrap();
        }

        let names: Vec<String> = db
            .all::<Colleague>()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_take_is_single_use() {
        let db = database();
        let token = MagicLinkToken {
            user_id: Uuid::new_v4(),
            token_hash: "abc".to_string(),
            expires_at: Utc::now(),
            created_at: Utc::now(),
        };
        db.save(&token).await.unwrap();

        assert!(db.take::<MagicLinkToken>("abc").await.unwrap().is_some());
        assert!(db.take::<MagicLinkToken>("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_link_lookup() {
        let db = database();
        let id = Uuid::new_v4();
        db.link(Table::ShareTokens, "token", id).await.unwrap();

        assert_eq!(db.lookup(Table::ShareTokens, "token").await.unwrap(), Some(id));
        assert_eq!(db.lookup(Table::ShareTokens, "other").await.unwrap(), None);
    }
}
