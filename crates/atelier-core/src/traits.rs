//! Common traits for the gateway and promo store seams
//!
//! Both collaborators are injected as capabilities so the orchestration
//! layer can be exercised against mocks.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};

/// Client for the external calendar authority
///
/// Implementations are stateless per call and fail closed: an ambiguous
/// outcome is an error, never an optimistic "available".
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Check real-time availability of a slot
    ///
    /// # Errors
    ///
    /// `AppError::Timeout` when the gateway does not answer within the
    /// configured bound, `AppError::Gateway` for any non-success response or
    /// unparsable body.
    async fn check_availability(&self, query: &SlotQuery)
        -> Result<AvailabilityOutcome, AppError>;

    /// Create a time-bound hold on a slot
    ///
    /// Same failure contract as [`Self::check_availability`]. Callers must
    /// only invoke this after a confirmed availability for the same query;
    /// the gateway client itself performs no such check.
    async fn create_hold(&self, request: &HoldRequest) -> Result<HoldOutcome, AppError>;
}

/// Durable per-customer promo flag store
#[async_trait]
pub trait PromoStore: Send + Sync {
    /// Whether the customer has already used the first-order discount
    async fn first_order_used(&self, customer_key: &str) -> Result<bool, AppError>;

    /// Mark the first-order discount as consumed
    async fn mark_first_order_used(&self, customer_key: &str) -> Result<(), AppError>;
}
