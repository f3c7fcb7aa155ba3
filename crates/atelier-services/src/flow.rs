//! Reservation flow
//!
//! Composes the per-session state machine with the calendar gateway, the
//! hold coordinator and the promo store into the workflow the HTTP handlers
//! drive. One `ReservationFlow` per customer session; callers serialize
//! access (the API layer keeps each flow behind an async mutex).

use std::sync::Arc;

use tracing::{info, instrument, warn};

use atelier_core::models::{DiscountPolicy, PackageDraft, PriceQuote, PricingTable, PromoState};
use atelier_core::traits::{CalendarGateway, PromoStore};
use atelier_core::AppResult;

use crate::hold::{HoldCoordinator, OrderContext};
use crate::pricing;
use crate::session::{AvailabilityTrack, HoldTrack, ReservationSession, SlotDraft};

pub struct ReservationFlow {
    gateway: Arc<dyn CalendarGateway>,
    promo: Arc<dyn PromoStore>,
    coordinator: HoldCoordinator,
    customer_key: String,
    session: ReservationSession,
    promo_state: PromoState,
    promo_written: bool,
}

impl ReservationFlow {
    /// Build a flow and load the customer's promo flag
    ///
    /// A promo store read failure is not fatal: the customer is treated as
    /// ineligible (no discount) rather than blocking the booking.
    pub async fn start(
        gateway: Arc<dyn CalendarGateway>,
        promo: Arc<dyn PromoStore>,
        customer_key: String,
    ) -> Self {
        let promo_state = match promo.first_order_used(&customer_key).await {
            Ok(true) => PromoState::used(),
            Ok(false) => PromoState::fresh(),
            Err(e) => {
                warn!(customer = %customer_key, "Promo store read failed, treating discount as consumed: {}", e);
                PromoState::used()
            }
        };

        Self {
            coordinator: HoldCoordinator::new(Arc::clone(&gateway)),
            gateway,
            promo,
            customer_key,
            session: ReservationSession::default(),
            promo_state,
            promo_written: false,
        }
    }

    pub fn session(&self) -> &ReservationSession {
        &self.session
    }

    pub fn promo_state(&self) -> &PromoState {
        &self.promo_state
    }

    pub fn update_slot(&mut self, draft: SlotDraft) {
        self.session.update_slot(draft);
    }

    /// Check availability for the current slot draft
    ///
    /// Validation and re-entrancy conflicts surface as errors; gateway
    /// outcomes (open, closed, failed) land in the availability track.
    #[instrument(skip(self), fields(customer = %self.customer_key))]
    pub async fn check_availability(&mut self) -> AppResult<&AvailabilityTrack> {
        let (ticket, query) = self.session.begin_check()?;

        let outcome = self.gateway.check_availability(&query).await;
        self.session.apply_check_outcome(ticket, outcome);

        Ok(self.session.availability())
    }

    /// Place a hold for the slot whose availability was confirmed
    ///
    /// On success the customer's one-time discount is consumed: the promo
    /// flag is written at most once per flow, and a store failure degrades
    /// to a warning because the hold itself already stands.
    #[instrument(skip(self, order), fields(customer = %self.customer_key))]
    pub async fn place_hold(&mut self, order: &OrderContext) -> AppResult<&HoldTrack> {
        let (ticket, query) = self.session.begin_hold()?;

        let outcome = self.coordinator.create_hold(&query, order).await;
        self.session.apply_hold_outcome(ticket, outcome);

        if self.session.hold().is_held() {
            self.consume_promo().await;
        }

        Ok(self.session.hold())
    }

    async fn consume_promo(&mut self) {
        if self.promo_written || self.promo_state.first_order_used {
            return;
        }

        if let Err(e) = self.promo.mark_first_order_used(&self.customer_key).await {
            warn!(customer = %self.customer_key, "Failed to persist promo flag: {}", e);
        } else {
            info!(customer = %self.customer_key, "First-order discount consumed");
        }

        // Either way the discount is gone for this flow; quotes must not
        // keep advertising it after a placed hold.
        self.promo_written = true;
        self.promo_state = PromoState::used();
    }

    /// Price the package draft under the customer's current promo state
    pub fn quote(
        &self,
        draft: &PackageDraft,
        pricing_table: &PricingTable,
        discount: &DiscountPolicy,
    ) -> PriceQuote {
        pricing::calc(draft, pricing_table, discount, &self.promo_state)
    }
}
