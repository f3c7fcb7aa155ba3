//! Hold request and outcome models
//!
//! A hold is a time-bound soft reservation of a slot, created by the
//! external calendar authority and pending final confirmation offline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::SlotQuery;

/// A hold-creation request
///
/// Carries the confirmed slot query plus the order context the studio needs
/// to follow up with the customer. The idempotency key is generated client
/// side, fresh per attempt, so the gateway can treat hold creation as an
/// atomic compare-and-set keyed by slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldRequest {
    pub slot: SlotQuery,
    /// Which catalog the customer was browsing
    pub catalog_ref: String,
    /// Selected service package identifier
    pub package_ref: String,
    pub city: String,
    pub comment: String,
    /// Customer locale, forwarded for the confirmation message
    pub locale: String,
    /// Page the order originated from
    pub source_page_url: String,
    pub idempotency_key: Uuid,
}

/// Result of a hold-creation request
///
/// The enum shape makes the protocol invariant structural: a hold id and
/// expiry exist exactly when the hold was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HoldOutcome {
    /// The gateway placed a hold on the slot
    Placed {
        hold_id: String,
        /// Strictly in the future at creation time
        expires_at: DateTime<Utc>,
    },
    /// The gateway declined the hold
    Rejected { reason: Option<String> },
}

impl HoldOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, HoldOutcome::Placed { .. })
    }
}
