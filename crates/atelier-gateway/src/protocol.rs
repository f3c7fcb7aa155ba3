//! Wire request/response shapes for the calendar gateway
//!
//! Field names are part of the external contract and are preserved exactly;
//! the only extension is the client-generated `idempotencyKey` on hold
//! creation (see DESIGN.md).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};
use atelier_core::{AppError, AppResult};

use crate::constants::{ACTION_AVAILABILITY, ACTION_HOLD};

/// Query parameters of the availability check
#[derive(Debug, Serialize)]
pub struct AvailabilityParams<'a> {
    pub token: &'a str,
    pub action: &'a str,
    pub date: String,
    pub time: String,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    #[serde(rename = "bufferMinutes")]
    pub buffer_minutes: u32,
    #[serde(rename = "maxBookingsPerDay")]
    pub max_bookings_per_day: u32,
}

impl<'a> AvailabilityParams<'a> {
    pub fn new(token: &'a str, query: &SlotQuery) -> Self {
        Self {
            token,
            action: ACTION_AVAILABILITY,
            date: query.date_param(),
            time: query.time_param(),
            duration_minutes: query.duration_minutes,
            buffer_minutes: query.buffer_minutes,
            max_bookings_per_day: query.max_bookings_per_day,
        }
    }
}

/// Response body of the availability check
#[derive(Debug, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub suggested: Option<String>,
}

impl AvailabilityResponse {
    pub fn into_outcome(self) -> AvailabilityOutcome {
        if self.available {
            AvailabilityOutcome::Open
        } else {
            AvailabilityOutcome::Closed {
                reason: self.reason,
                suggested: self.suggested,
            }
        }
    }
}

/// JSON body of the hold creation request
#[derive(Debug, Serialize)]
pub struct HoldBody<'a> {
    pub token: &'a str,
    pub action: &'a str,
    pub catalog: &'a str,
    pub pkg: &'a str,
    pub city: &'a str,
    pub date: String,
    pub time: String,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    #[serde(rename = "bufferMinutes")]
    pub buffer_minutes: u32,
    pub lang: &'a str,
    pub comment: &'a str,
    #[serde(rename = "pageUrl")]
    pub page_url: &'a str,
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: String,
}

impl<'a> HoldBody<'a> {
    pub fn new(token: &'a str, request: &'a HoldRequest) -> Self {
        Self {
            token,
            action: ACTION_HOLD,
            catalog: &request.catalog_ref,
            pkg: &request.package_ref,
            city: &request.city,
            date: request.slot.date_param(),
            time: request.slot.time_param(),
            duration_minutes: request.slot.duration_minutes,
            buffer_minutes: request.slot.buffer_minutes,
            lang: &request.locale,
            comment: &request.comment,
            page_url: &request.source_page_url,
            idempotency_key: request.idempotency_key.to_string(),
        }
    }
}

/// Response body of the hold creation request
#[derive(Debug, Deserialize)]
pub struct HoldResponse {
    #[serde(rename = "okHold")]
    pub ok_hold: bool,
    #[serde(rename = "holdId", default)]
    pub hold_id: Option<String>,
    #[serde(rename = "expiresAt", default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl HoldResponse {
    /// Map the wire response into a domain outcome, enforcing the hold
    /// invariants.
    ///
    /// A response claiming success without a hold id and a future expiry is
    /// a protocol violation and maps to `AppError::Gateway` (fail-closed).
    pub fn into_outcome(self, now: DateTime<Utc>) -> AppResult<HoldOutcome> {
        if !self.ok_hold {
            return Ok(HoldOutcome::Rejected {
                reason: self.reason,
            });
        }

        let hold_id = self
            .hold_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Gateway("hold marked ok without holdId".to_string()))?;

        let raw = self
            .expires_at
            .ok_or_else(|| AppError::Gateway("hold marked ok without expiresAt".to_string()))?;

        let expires_at = raw
            .parse::<DateTime<Utc>>()
            .map_err(|_| AppError::Gateway(format!("unparsable expiresAt '{}'", raw)))?;

        if expires_at <= now {
            return Err(AppError::Gateway(format!(
                "hold expiry {} is not in the future",
                expires_at
            )));
        }

        Ok(HoldOutcome::Placed {
            hold_id,
            expires_at,
        })
    }
}
