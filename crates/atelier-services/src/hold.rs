//! Hold coordinator
//!
//! Turns a validated slot query plus the customer's order details into a
//! gateway hold request. Each attempt carries a fresh idempotency key so the
//! gateway can deduplicate retries of the same attempt without confusing
//! distinct attempts.

use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use atelier_core::models::{HoldOutcome, HoldRequest, SlotQuery};
use atelier_core::traits::CalendarGateway;
use atelier_core::AppResult;

/// Order details accompanying a hold, unrelated to the slot itself
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    pub catalog_ref: String,
    pub package_ref: String,
    pub city: String,
    pub comment: String,
    pub locale: String,
    pub source_page_url: String,
}

/// Issues hold requests against the calendar gateway
pub struct HoldCoordinator {
    gateway: Arc<dyn CalendarGateway>,
}

impl HoldCoordinator {
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        Self { gateway }
    }

    /// Place a hold for a slot whose availability was confirmed by the caller
    #[instrument(skip(self, order), fields(date = %query.date_param(), time = %query.time_param()))]
    pub async fn create_hold(
        &self,
        query: &SlotQuery,
        order: &OrderContext,
    ) -> AppResult<HoldOutcome> {
        let request = HoldRequest {
            slot: query.clone(),
            catalog_ref: order.catalog_ref.clone(),
            package_ref: order.package_ref.clone(),
            city: order.city.clone(),
            comment: order.comment.clone(),
            locale: if order.locale.is_empty() {
                crate::constants::DEFAULT_LOCALE.to_string()
            } else {
                order.locale.clone()
            },
            source_page_url: order.source_page_url.clone(),
            idempotency_key: Uuid::new_v4(),
        };

        debug!(key = %request.idempotency_key, "Placing hold");
        self.gateway.create_hold(&request).await
    }
}
