//! Booking DTOs
//!
//! Request and response shapes for the booking endpoints. Requests use
//! camelCase field names; responses render the track states with
//! user-facing messages only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_core::models::slot::{
    DEFAULT_BUFFER_MINUTES, DEFAULT_DURATION_MINUTES, DEFAULT_MAX_BOOKINGS_PER_DAY,
};
use atelier_core::models::{MonthlyPlan, PackageDraft, PriceQuote, SessionLength};
use atelier_services::{AvailabilityTrack, HoldTrack, OrderContext, SlotDraft};

/// Availability check request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub session_id: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_minutes: Option<u32>,
    #[serde(default)]
    pub max_bookings_per_day: Option<u32>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl CheckRequest {
    pub fn slot_draft(&self) -> SlotDraft {
        let defaults = SlotDraft::default();
        SlotDraft {
            date: self.date.clone(),
            time: self.time.clone(),
            duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            buffer_minutes: self.buffer_minutes.unwrap_or(DEFAULT_BUFFER_MINUTES),
            max_bookings_per_day: self
                .max_bookings_per_day
                .unwrap_or(DEFAULT_MAX_BOOKINGS_PER_DAY),
            timezone: self.timezone.clone().unwrap_or(defaults.timezone),
        }
    }
}

/// Hold request: order details for the slot checked under the same session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldOrderRequest {
    pub session_id: String,
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub pkg: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub page_url: String,
}

impl HoldOrderRequest {
    pub fn order_context(&self) -> OrderContext {
        OrderContext {
            catalog_ref: self.catalog.clone(),
            package_ref: self.pkg.clone(),
            city: self.city.clone(),
            comment: self.comment.clone(),
            locale: self.lang.clone(),
            source_page_url: self.page_url.clone(),
        }
    }
}

/// Package selection for a quote
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDraftDto {
    #[serde(default = "default_duration")]
    pub duration: SessionLength,
    #[serde(default)]
    pub reels: u32,
    #[serde(default)]
    pub photos: u32,
    #[serde(default)]
    pub monthly_plan: MonthlyPlan,
    #[serde(default)]
    pub social_management: bool,
    #[serde(default)]
    pub targeting_setup: bool,
}

fn default_duration() -> SessionLength {
    SessionLength::TwoHours
}

impl PackageDraftDto {
    pub fn into_draft(self) -> PackageDraft {
        PackageDraft {
            duration: self.duration,
            reels: self.reels,
            photos: self.photos,
            monthly_plan: self.monthly_plan,
            social_management: self.social_management,
            targeting_setup: self.targeting_setup,
        }
    }
}

/// Quote request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub session_id: String,
    pub package: PackageDraftDto,
}

/// Availability track as reported to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityStateDto {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&AvailabilityTrack> for AvailabilityStateDto {
    fn from(track: &AvailabilityTrack) -> Self {
        match track {
            AvailabilityTrack::Idle => Self::bare("idle"),
            AvailabilityTrack::Checking { .. } => Self::bare("checking"),
            AvailabilityTrack::Available(_) => Self::bare("available"),
            AvailabilityTrack::Unavailable { reason, suggested } => Self {
                status: "unavailable",
                reason: reason.clone(),
                suggested: suggested.clone(),
                message: None,
            },
            AvailabilityTrack::Failed { message } => Self {
                status: "failed",
                reason: None,
                suggested: None,
                message: Some(message.clone()),
            },
        }
    }
}

impl AvailabilityStateDto {
    fn bare(status: &'static str) -> Self {
        Self {
            status,
            reason: None,
            suggested: None,
            message: None,
        }
    }
}

/// Hold track as reported to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldStateDto {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&HoldTrack> for HoldStateDto {
    fn from(track: &HoldTrack) -> Self {
        match track {
            HoldTrack::Idle => Self::bare("idle"),
            HoldTrack::Holding { .. } => Self::bare("holding"),
            HoldTrack::Held {
                hold_id,
                expires_at,
            } => Self {
                status: "held",
                hold_id: Some(hold_id.clone()),
                expires_at: Some(*expires_at),
                message: None,
            },
            HoldTrack::Failed { message } => Self {
                status: "failed",
                hold_id: None,
                expires_at: None,
                message: Some(message.clone()),
            },
        }
    }
}

impl HoldStateDto {
    fn bare(status: &'static str) -> Self {
        Self {
            status,
            hold_id: None,
            expires_at: None,
            message: None,
        }
    }
}

/// One quote line
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLineDto {
    pub label: String,
    pub amount: Decimal,
}

/// Price quote response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub lines: Vec<QuoteLineDto>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub currency: String,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            lines: quote
                .lines
                .into_iter()
                .map(|l| QuoteLineDto {
                    label: l.label,
                    amount: l.amount,
                })
                .collect(),
            subtotal: quote.subtotal,
            discount: quote.discount_amount,
            total: quote.total,
            currency: quote.currency_symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_request_camel_case_and_defaults() {
        let req: CheckRequest = serde_json::from_str(
            r#"{"sessionId":"s-1","date":"2026-09-14","time":"10:30","durationMinutes":240}"#,
        )
        .unwrap();

        let draft = req.slot_draft();
        assert_eq!(draft.date, "2026-09-14");
        assert_eq!(draft.duration_minutes, 240);
        assert_eq!(draft.buffer_minutes, DEFAULT_BUFFER_MINUTES);
        assert_eq!(draft.max_bookings_per_day, DEFAULT_MAX_BOOKINGS_PER_DAY);
    }

    #[test]
    fn test_hold_request_maps_to_order_context() {
        let req: HoldOrderRequest = serde_json::from_str(
            r#"{"sessionId":"s-1","catalog":"cat-1","pkg":"pkg-7","city":"Paris","pageUrl":"https://example.com/book"}"#,
        )
        .unwrap();

        let order = req.order_context();
        assert_eq!(order.catalog_ref, "cat-1");
        assert_eq!(order.package_ref, "pkg-7");
        assert_eq!(order.source_page_url, "https://example.com/book");
        assert!(order.comment.is_empty());
    }

    #[test]
    fn test_package_dto_duration_tokens() {
        let dto: PackageDraftDto =
            serde_json::from_str(r#"{"duration":"4h","reels":2,"monthlyPlan":"growth"}"#).unwrap();
        let draft = dto.into_draft();
        assert_eq!(draft.duration, SessionLength::FourHours);
        assert_eq!(draft.monthly_plan, MonthlyPlan::Growth);
        assert_eq!(draft.photos, 0);
    }

    #[test]
    fn test_availability_state_failed_carries_message_only() {
        let dto = AvailabilityStateDto::from(&AvailabilityTrack::Failed {
            message: "We cannot determine availability right now. Please try again in a moment."
                .to_string(),
        });

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(!json.contains("reason"));
    }

    #[test]
    fn test_hold_state_held_serialization() {
        let dto = HoldStateDto::from(&HoldTrack::Held {
            hold_id: "h-9".to_string(),
            expires_at: Utc::now(),
        });

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"holdId\":\"h-9\""));
        assert!(json.contains("expiresAt"));
        assert!(!json.contains("message"));
    }
}
