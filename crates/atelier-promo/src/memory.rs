//! In-memory promo store
//!
//! Test double for the `PromoStore` capability. Also counts writes so tests
//! can assert the write-exactly-once behavior of the reservation flow.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use atelier_core::error::AppError;
use atelier_core::traits::PromoStore;

/// In-memory fake of the durable promo flag
#[derive(Default)]
pub struct MemoryPromoStore {
    used: Mutex<HashSet<String>>,
    writes: Mutex<u32>,
}

impl MemoryPromoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a customer as having consumed the discount
    pub fn with_used(customer_key: &str) -> Self {
        let store = Self::new();
        store.used.lock().insert(customer_key.to_string());
        store
    }

    /// Number of `mark_first_order_used` calls observed
    pub fn write_count(&self) -> u32 {
        *self.writes.lock()
    }
}

#[async_trait]
impl PromoStore for MemoryPromoStore {
    async fn first_order_used(&self, customer_key: &str) -> Result<bool, AppError> {
        Ok(self.used.lock().contains(customer_key))
    }

    async fn mark_first_order_used(&self, customer_key: &str) -> Result<(), AppError> {
        self.used.lock().insert(customer_key.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }
}
