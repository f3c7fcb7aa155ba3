//! Slot query and availability models
//!
//! A slot is a specific date/time/duration window being reserved. Queries
//! are transient: any edit to date or time discards the query and every
//! result derived from it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppResult;

/// Default session duration when the client does not specify one
pub const DEFAULT_DURATION_MINUTES: u32 = 120;

/// Default setup/teardown buffer around a session
pub const DEFAULT_BUFFER_MINUTES: u32 = 30;

/// Default cap on bookings accepted per calendar day
pub const DEFAULT_MAX_BOOKINGS_PER_DAY: u32 = 2;

/// A validated slot query
///
/// Constructed only through [`SlotQuery::parse`], which enforces the strict
/// `YYYY-MM-DD` / `HH:MM` input formats before anything touches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub buffer_minutes: u32,
    pub max_bookings_per_day: u32,
    pub timezone: String,
}

impl SlotQuery {
    /// Parse and validate raw date/time input into a slot query
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the date is not exactly
    /// `YYYY-MM-DD`, the time is not exactly `HH:MM`, or either denotes a
    /// value that does not exist on the calendar (e.g. month 13).
    pub fn parse(
        date: &str,
        time: &str,
        duration_minutes: u32,
        buffer_minutes: u32,
        max_bookings_per_day: u32,
        timezone: &str,
    ) -> AppResult<Self> {
        let date = parse_date(date)?;
        let time = parse_time(time)?;

        if duration_minutes == 0 {
            return Err(AppError::Validation(
                "duration must be at least one minute".to_string(),
            ));
        }

        Ok(Self {
            date,
            time,
            duration_minutes,
            buffer_minutes,
            max_bookings_per_day,
            timezone: timezone.to_string(),
        })
    }

    /// Date formatted for the gateway wire protocol (`YYYY-MM-DD`)
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Time formatted for the gateway wire protocol (`HH:MM`)
    pub fn time_param(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Strictly parse a `YYYY-MM-DD` date
///
/// chrono alone accepts unpadded components, so the shape is checked first.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shape_ok {
        return Err(AppError::Validation(format!(
            "invalid date '{}': expected YYYY-MM-DD",
            s
        )));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date '{}': no such calendar day", s)))
}

/// Strictly parse a `HH:MM` time
pub fn parse_time(s: &str) -> AppResult<NaiveTime> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());

    if !shape_ok {
        return Err(AppError::Validation(format!(
            "invalid time '{}': expected HH:MM",
            s
        )));
    }

    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| AppError::Validation(format!("invalid time '{}': out of range", s)))
}

/// Result of an availability check
///
/// Produced only by the gateway client. There is deliberately no `Default`
/// impl: an availability result never springs into existence as "open",
/// every instance traces back to a gateway response (fail-closed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvailabilityOutcome {
    /// The slot can be booked
    Open,
    /// The slot cannot be booked
    Closed {
        /// Gateway-supplied reason, if any
        reason: Option<String>,
        /// Alternative slot suggested by the gateway, if any
        suggested: Option<String>,
    },
}

impl AvailabilityOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, AvailabilityOutcome::Open)
    }
}
