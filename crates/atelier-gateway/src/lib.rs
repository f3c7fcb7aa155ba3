//! Calendar gateway integration for Atelier Booking
//!
//! This crate provides the client for the external calendar authority — the
//! system of record for slot state. The client is stateless per call and
//! fail-closed: every ambiguous outcome (timeout, transport failure,
//! non-success status, unparsable body) surfaces as an error, never as an
//! optimistic "available".
//!
//! # Architecture
//!
//! ```text
//!  Reservation flow
//!         |
//!         v
//!  HttpCalendarGateway (reqwest, bounded timeout)
//!         |
//!         v
//!  protocol (wire request/response shapes)
//!         |
//!         v
//!  External calendar authority
//! ```

pub mod client;
pub mod protocol;

pub use client::HttpCalendarGateway;

/// Gateway protocol constants
pub mod constants {
    /// Action token for the read-only availability check
    pub const ACTION_AVAILABILITY: &str = "availability";

    /// Action token for the mutating hold creation
    pub const ACTION_HOLD: &str = "hold";

    /// Reference per-call timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 7;
}
