//! HTTP API layer for Atelier Booking
//!
//! Request/response DTOs, the per-session flow registry and the actix-web
//! handlers for the booking workflow.

pub mod dto;
pub mod handlers;
pub mod sessions;

pub use dto::{AvailabilityStateDto, HoldStateDto, QuoteResponse};
pub use handlers::{configure_booking, configure_health};
pub use sessions::SessionRegistry;
