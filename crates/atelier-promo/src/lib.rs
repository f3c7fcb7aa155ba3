//! Durable promo-state store for Atelier Booking
//!
//! Persists one boolean per customer: whether the one-time first-order
//! discount has been consumed. The flag is read once at session start and
//! written at most once, on the first successful hold.
//!
//! Two implementations of the `PromoStore` capability:
//!
//! - [`RedisPromoStore`] — production store over a Redis ConnectionManager
//! - [`MemoryPromoStore`] — in-memory fake for tests

pub mod keys;
pub mod memory;

pub use memory::MemoryPromoStore;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use tracing::{debug, error};

use atelier_core::error::AppError;
use atelier_core::traits::PromoStore;

/// Value stored under the first-order key once the discount is consumed
const FLAG_VALUE: &str = "1";

/// Redis-backed promo store
///
/// Wraps a Redis ConnectionManager for multiplexed access. Entries carry no
/// TTL: promo eligibility is durable state, not a cache.
#[derive(Clone)]
pub struct RedisPromoStore {
    manager: ConnectionManager,
}

impl RedisPromoStore {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// Returns `AppError::PromoStoreConnection` if the URL is invalid or the
    /// connection cannot be established. This is a startup-time failure.
    pub async fn new(url: &str) -> Result<Self, AppError> {
        debug!("Connecting to promo store at {}", url);

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            AppError::PromoStoreConnection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            AppError::PromoStoreConnection(format!("Connection failed: {}", e))
        })?;

        debug!("Promo store connection established");
        Ok(Self { manager })
    }

    /// Ping the Redis server to check connectivity
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Promo store ping failed: {}", e);
                AppError::PromoStore(format!("Ping failed: {}", e))
            })?;
        Ok(())
    }

    fn map_redis_error(err: RedisError) -> AppError {
        match err.kind() {
            redis::ErrorKind::IoError => {
                error!("Promo store I/O error: {}", err);
                AppError::PromoStoreConnection(format!("I/O error: {}", err))
            }
            _ => {
                error!("Promo store error: {}", err);
                AppError::PromoStore(err.to_string())
            }
        }
    }
}

#[async_trait]
impl PromoStore for RedisPromoStore {
    async fn first_order_used(&self, customer_key: &str) -> Result<bool, AppError> {
        let key = keys::first_order(customer_key);
        debug!("GET {}", key);

        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(&key).await.map_err(Self::map_redis_error)?;

        Ok(value.as_deref() == Some(FLAG_VALUE))
    }

    async fn mark_first_order_used(&self, customer_key: &str) -> Result<(), AppError> {
        let key = keys::first_order(customer_key);
        debug!("SET {}", key);

        let mut conn = self.manager.clone();
        let _: () = conn
            .set(&key, FLAG_VALUE)
            .await
            .map_err(Self::map_redis_error)?;

        Ok(())
    }
}
