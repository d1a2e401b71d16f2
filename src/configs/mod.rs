use deadpool_redis::{redis::AsyncCommands, Runtime};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, ENV};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations applied");

    Ok(pool)
}

/// Byte-level key/value store with per-key expiration (seconds).
#[async_trait::async_trait]
pub trait Cache: Send + Sync {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError>;

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        expiration: u64,
    ) -> Result<(), error::SystemError>;

    async fn delete(&self, key: &str) -> Result<(), error::SystemError>;
}

pub async fn get_json<C, T>(cache: &C, key: &str) -> Result<Option<T>, error::SystemError>
where
    C: Cache + ?Sized,
    T: serde::de::DeserializeOwned,
{
    match cache.get_bytes(key).await? {
        Some(v) => Ok(Some(serde_json::from_slice(&v)?)),
        None => Ok(None),
    }
}

pub async fn set_json<C, T>(
    cache: &C,
    key: &str,
    value: &T,
    expiration: u64,
) -> Result<(), error::SystemError>
where
    C: Cache + ?Sized,
    T: serde::Serialize,
{
    let serialized = serde_json::to_vec(value)?;
    cache.set_bytes(key, serialized, expiration).await
}

#[derive(Clone)]
pub struct RedisCache {
    pool: deadpool_redis::Pool,
}

impl RedisCache {
    pub async fn new() -> Result<Self, error::SystemError> {
        let mut cfg = deadpool_redis::Config::from_url(&ENV.redis_url);
        cfg.pool = Some(deadpool_redis::PoolConfig { max_size: 16, ..Default::default() });
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl Cache for RedisCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        let mut conn = self.pool.get().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        expiration: u64,
    ) -> Result<(), error::SystemError> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(key, value, expiration).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), error::SystemError> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
