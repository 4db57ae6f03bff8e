use std::sync::Arc;

use crate::{
    config::{Config, StoreKind},
    database::{Database, MemoryStore, RedisStore},
    email::Mailer,
    error::AppError,
};

pub struct State {
    pub config: Config,
    pub db: Database,
    pub mailer: Mailer,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let db = match config.store {
            StoreKind::Redis => Database::new(Arc::new(RedisStore::connect(&config.redis_url).await?)),
            StoreKind::Memory => Database::new(Arc::new(MemoryStore::default())),
        };

        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Arc<Self> {
        let mailer = Mailer::new(&config);

        Arc::new(Self { config, db, mailer })
    }
}
