use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;

use super::{Store, Table};
use crate::error::AppError;

/// In-process store for tests and throwaway local runs. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: DashMap<Table, IndexMap<String, String>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, table: Table, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .tables
            .get(&table)
            .and_then(|rows| rows.get(key).cloned()))
    }

    async fn put(&self, table: Table, key: &str, value: String) -> Result<(), AppError> {
        self.tables
            .entry(table)
            .or_default()
            .insert(key.to_string(), value);

        Ok(())
    }

    async fn delete(&self, table: Table, key: &str) -> Result<bool, AppError> {
        Ok(self.take(table, key).await?.is_some())
    }

    async fn values(&self, table: Table) -> Result<Vec<String>, AppError> {
        Ok(self
            .tables
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn take(&self, table: Table, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .tables
            .get_mut(&table)
            .and_then(|mut rows| rows.shift_remove(key)))
    }
}
