//! Business logic for the Atelier Booking reservation workflow
//!
//! This crate contains the orchestration and calculation services sitting
//! between the HTTP surface and the external collaborators:
//!
//! - `pricing` - pure price quote calculation for a package draft
//! - `session` - the per-session reservation state machine (two tracks,
//!   staleness and re-entrancy guards)
//! - `hold` - the hold coordinator issuing hold requests with idempotency keys
//! - `flow` - the reservation flow composing session, gateway, coordinator
//!   and promo store
//!
//! Services take their collaborators as `Arc`'d trait objects so tests can
//! substitute mocks; all operations are instrumented with tracing.

pub mod flow;
pub mod hold;
pub mod pricing;
pub mod session;

pub use flow::ReservationFlow;
pub use hold::{HoldCoordinator, OrderContext};
pub use session::{
    AvailabilityTrack, CheckTicket, HoldTicket, HoldTrack, ReservationSession, SlotDraft,
};

/// Workflow constants
pub mod constants {
    /// Locale forwarded to the gateway when the client supplies none
    pub const DEFAULT_LOCALE: &str = "en";

    /// Timezone assumed for slot queries when the client supplies none
    pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";
}
