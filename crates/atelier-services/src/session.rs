//! Reservation state machine
//!
//! Per-session state for the check -> hold workflow, kept as two parallel
//! tracks:
//!
//! ```text
//! availability: Idle -> Checking -> { Available | Unavailable | Failed }
//! hold:         Idle -> Holding  -> { Held | Failed }
//! ```
//!
//! The machine is synchronous and owns no I/O. Network calls happen outside:
//! `begin_*` hands out a ticket tagged with the current query generation and
//! a per-track sequence number, and `apply_*` only accepts the latest ticket
//! issued for its track. A late response from a superseded query is thereby
//! discarded, never applied (cooperative cancellation).
//!
//! Guards:
//! - one in-flight request per track (`begin_*` while in flight is a conflict)
//! - a hold can only start from an [`AvailabilityWitness`], which exists
//!   exclusively inside the `Available` state of the current generation, so
//!   "hold without confirmed availability" is unrepresentable
//! - `Held` is terminal; only a date/time edit leaves it, resetting both
//!   tracks and discarding pending results

use chrono::{DateTime, Utc};
use tracing::debug;

use atelier_core::models::slot::{
    DEFAULT_BUFFER_MINUTES, DEFAULT_DURATION_MINUTES, DEFAULT_MAX_BOOKINGS_PER_DAY,
};
use atelier_core::models::{AvailabilityOutcome, HoldOutcome, SlotQuery};
use atelier_core::{AppError, AppResult};

use crate::constants::DEFAULT_TIMEZONE;

/// Raw, editable slot input as it arrives from the booking form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraft {
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub buffer_minutes: u32,
    pub max_bookings_per_day: u32,
    pub timezone: String,
}

impl Default for SlotDraft {
    fn default() -> Self {
        Self {
            date: String::new(),
            time: String::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            max_bookings_per_day: DEFAULT_MAX_BOOKINGS_PER_DAY,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Proof that availability was confirmed for the current query generation
///
/// Lives only inside [`AvailabilityTrack::Available`]; a date/time edit
/// replaces the track and the witness with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWitness {
    generation: u64,
}

/// Availability track states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityTrack {
    Idle,
    Checking { seq: u64 },
    Available(AvailabilityWitness),
    Unavailable {
        reason: Option<String>,
        suggested: Option<String>,
    },
    Failed { message: String },
}

impl AvailabilityTrack {
    pub fn is_checking(&self) -> bool {
        matches!(self, AvailabilityTrack::Checking { .. })
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityTrack::Available(_))
    }
}

/// Hold track states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldTrack {
    Idle,
    Holding { seq: u64 },
    Held {
        hold_id: String,
        expires_at: DateTime<Utc>,
    },
    Failed { message: String },
}

impl HoldTrack {
    pub fn is_holding(&self) -> bool {
        matches!(self, HoldTrack::Holding { .. })
    }

    pub fn is_held(&self) -> bool {
        matches!(self, HoldTrack::Held { .. })
    }
}

/// Ticket for an in-flight availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTicket {
    generation: u64,
    seq: u64,
}

/// Ticket for an in-flight hold request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTicket {
    generation: u64,
    seq: u64,
}

/// The per-session reservation state machine
#[derive(Debug)]
pub struct ReservationSession {
    draft: SlotDraft,
    /// Bumped on every date/time edit; tickets from older generations are stale
    generation: u64,
    check_seq: u64,
    hold_seq: u64,
    availability: AvailabilityTrack,
    hold: HoldTrack,
    /// The validated query the current availability result belongs to
    active_query: Option<SlotQuery>,
}

impl Default for ReservationSession {
    fn default() -> Self {
        Self::new(SlotDraft::default())
    }
}

impl ReservationSession {
    pub fn new(draft: SlotDraft) -> Self {
        Self {
            draft,
            generation: 0,
            check_seq: 0,
            hold_seq: 0,
            availability: AvailabilityTrack::Idle,
            hold: HoldTrack::Idle,
            active_query: None,
        }
    }

    pub fn draft(&self) -> &SlotDraft {
        &self.draft
    }

    pub fn availability(&self) -> &AvailabilityTrack {
        &self.availability
    }

    pub fn hold(&self) -> &HoldTrack {
        &self.hold
    }

    /// Replace the slot input
    ///
    /// An edit to date or time resets both tracks to `Idle` and invalidates
    /// every outstanding ticket. Edits to the remaining fields keep the
    /// tracks; they only take effect on the next check.
    pub fn update_slot(&mut self, draft: SlotDraft) {
        if draft.date != self.draft.date || draft.time != self.draft.time {
            debug!(
                "Slot edit {}/{} -> {}/{}: resetting both tracks",
                self.draft.date, self.draft.time, draft.date, draft.time
            );
            self.reset_tracks();
        }
        self.draft = draft;
    }

    fn reset_tracks(&mut self) {
        self.generation += 1;
        self.availability = AvailabilityTrack::Idle;
        self.hold = HoldTrack::Idle;
        self.active_query = None;
    }

    /// Start an availability check for the current draft
    ///
    /// Validates the date/time format strictly before anything else; on
    /// malformed input the availability track goes to `Failed` and no
    /// gateway call must be made.
    ///
    /// # Errors
    ///
    /// `AppError::Validation` for malformed input, `AppError::Conflict` when
    /// a check is already in flight, a hold is in flight, or the slot is
    /// already held.
    pub fn begin_check(&mut self) -> AppResult<(CheckTicket, SlotQuery)> {
        if self.availability.is_checking() {
            return Err(AppError::Conflict(
                "availability check already in progress".to_string(),
            ));
        }
        if self.hold.is_holding() {
            return Err(AppError::Conflict(
                "hold in progress; the slot cannot be re-checked".to_string(),
            ));
        }
        if self.hold.is_held() {
            return Err(AppError::Conflict(
                "slot already held; change date or time to start over".to_string(),
            ));
        }

        let query = match SlotQuery::parse(
            &self.draft.date,
            &self.draft.time,
            self.draft.duration_minutes,
            self.draft.buffer_minutes,
            self.draft.max_bookings_per_day,
            &self.draft.timezone,
        ) {
            Ok(query) => query,
            Err(e) => {
                self.availability = AvailabilityTrack::Failed {
                    message: e.user_message(),
                };
                return Err(e);
            }
        };

        self.check_seq += 1;
        self.availability = AvailabilityTrack::Checking {
            seq: self.check_seq,
        };
        self.active_query = Some(query.clone());

        Ok((
            CheckTicket {
                generation: self.generation,
                seq: self.check_seq,
            },
            query,
        ))
    }

    /// Apply the result of an availability check
    ///
    /// Returns `false` when the ticket is stale (superseded by an edit or a
    /// newer check); a stale result is discarded without touching the track.
    pub fn apply_check_outcome(
        &mut self,
        ticket: CheckTicket,
        outcome: AppResult<AvailabilityOutcome>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.seq != self.check_seq {
            debug!(
                "Discarding stale availability result (ticket gen {} seq {}, current gen {} seq {})",
                ticket.generation, ticket.seq, self.generation, self.check_seq
            );
            return false;
        }
        if !self.availability.is_checking() {
            return false;
        }

        self.availability = match outcome {
            Ok(AvailabilityOutcome::Open) => AvailabilityTrack::Available(AvailabilityWitness {
                generation: self.generation,
            }),
            Ok(AvailabilityOutcome::Closed { reason, suggested }) => {
                AvailabilityTrack::Unavailable { reason, suggested }
            }
            Err(e) => AvailabilityTrack::Failed {
                message: e.user_message(),
            },
        };

        true
    }

    /// Start a hold for the slot whose availability was just confirmed
    ///
    /// Requires the witness carried by the `Available` state; there is no
    /// other way to obtain a [`HoldTicket`].
    ///
    /// # Errors
    ///
    /// `AppError::Conflict` when availability is not confirmed for the
    /// current query, a hold is already in flight, or the slot is held.
    pub fn begin_hold(&mut self) -> AppResult<(HoldTicket, SlotQuery)> {
        if self.hold.is_holding() {
            return Err(AppError::Conflict("hold already in progress".to_string()));
        }
        if self.hold.is_held() {
            return Err(AppError::Conflict("slot already held".to_string()));
        }

        let witness = match &self.availability {
            AvailabilityTrack::Available(witness) => *witness,
            _ => {
                return Err(AppError::Conflict(
                    "hold requires confirmed availability for the current slot".to_string(),
                ))
            }
        };

        // The witness cannot outlive its generation: every reset replaces
        // the availability track.
        debug_assert_eq!(witness.generation, self.generation);

        let query = self
            .active_query
            .clone()
            .ok_or_else(|| AppError::Internal("available state without a query".to_string()))?;

        self.hold_seq += 1;
        self.hold = HoldTrack::Holding { seq: self.hold_seq };

        Ok((
            HoldTicket {
                generation: witness.generation,
                seq: self.hold_seq,
            },
            query,
        ))
    }

    /// Apply the result of a hold request
    ///
    /// Returns `false` when the ticket is stale. A rejected hold surfaces as
    /// `Failed` with the gateway's reason; it is an expected state, not a
    /// crash.
    pub fn apply_hold_outcome(&mut self, ticket: HoldTicket, outcome: AppResult<HoldOutcome>) -> bool {
        if ticket.generation != self.generation || ticket.seq != self.hold_seq {
            debug!(
                "Discarding stale hold result (ticket gen {} seq {}, current gen {} seq {})",
                ticket.generation, ticket.seq, self.generation, self.hold_seq
            );
            return false;
        }
        if !self.hold.is_holding() {
            return false;
        }

        self.hold = match outcome {
            Ok(HoldOutcome::Placed {
                hold_id,
                expires_at,
            }) => HoldTrack::Held {
                hold_id,
                expires_at,
            },
            Ok(HoldOutcome::Rejected { reason }) => HoldTrack::Failed {
                message: reason.unwrap_or_else(|| "slot is no longer available".to_string()),
            },
            Err(e) => HoldTrack::Failed {
                message: e.user_message(),
            },
        };

        true
    }
}
