use std::time::Duration;

use ::redis::{
    AsyncCommands, Client, pipe,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use async_trait::async_trait;
use tracing::info;

use super::{Store, Table};
use crate::error::AppError;

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(3)
            .set_connection_timeout(Duration::from_secs(2));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        info!("Connected to Redis at {redis_url}");

        Ok(Self { connection })
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, table: Table, key: &str) -> Result<Option<String>, AppError> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.hget(table.key(), key).await?;

        Ok(value)
    }

    async fn put(&self, table: Table, key: &str, value: String) -> Result<(), AppError> {
        let mut connection = self.connection.clone();
        let _: () = connection.hset(table.key(), key, value).await?;

        Ok(())
    }

    async fn delete(&self, table: Table, key: &str) -> Result<bool, AppError> {
        let mut connection = self.connection.clone();
        let removed: i64 = connection.hdel(table.key(), key).await?;

        Ok(removed > 0)
    }

    async fn values(&self, table: Table) -> Result<Vec<String>, AppError> {
        let mut connection = self.connection.clone();
        let values: Vec<String> = connection.hvals(table.key()).await?;

        Ok(values)
    }

    async fn take(&self, table: Table, key: &str) -> Result<Option<String>, AppError> {
        let mut connection = self.connection.clone();
        let (value, _removed): (Option<String>, i64) = pipe()
            .atomic()
            .hget(table.key(), key)
            .hdel(table.key(), key)
            .query_async(&mut connection)
            .await?;

        Ok(value)
    }
}
