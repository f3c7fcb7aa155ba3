//! Service package models
//!
//! A package draft captures what the customer is configuring on the order
//! page: either a one-off session (duration + deliverables) or a monthly
//! retainer plan, plus optional add-ons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete session duration tiers
///
/// Exactly five tiers exist; prices are looked up per tier, never
/// interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionLength {
    #[default]
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "8h")]
    EightHours,
    #[serde(rename = "day")]
    FullDay,
    #[serde(rename = "week")]
    FullWeek,
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionLength::TwoHours => write!(f, "2h"),
            SessionLength::FourHours => write!(f, "4h"),
            SessionLength::EightHours => write!(f, "8h"),
            SessionLength::FullDay => write!(f, "day"),
            SessionLength::FullWeek => write!(f, "week"),
        }
    }
}

impl SessionLength {
    /// Parse from the wire token
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "2h" => Some(SessionLength::TwoHours),
            "4h" => Some(SessionLength::FourHours),
            "8h" => Some(SessionLength::EightHours),
            "day" => Some(SessionLength::FullDay),
            "week" => Some(SessionLength::FullWeek),
            _ => None,
        }
    }
}

/// Monthly retainer tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyPlan {
    /// One-off session, no retainer
    #[default]
    None,
    Starter,
    Growth,
    Pro,
}

impl fmt::Display for MonthlyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthlyPlan::None => write!(f, "none"),
            MonthlyPlan::Starter => write!(f, "starter"),
            MonthlyPlan::Growth => write!(f, "growth"),
            MonthlyPlan::Pro => write!(f, "pro"),
        }
    }
}

impl MonthlyPlan {
    /// Parse from the wire token
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(MonthlyPlan::None),
            "starter" => Some(MonthlyPlan::Starter),
            "growth" => Some(MonthlyPlan::Growth),
            "pro" => Some(MonthlyPlan::Pro),
            _ => None,
        }
    }

    pub fn is_retainer(&self) -> bool {
        !matches!(self, MonthlyPlan::None)
    }
}

/// The package the customer is configuring
///
/// When `monthly_plan` is a retainer, `duration`/`reels`/`photos` are
/// ignored by the pricing engine regardless of their stored values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackageDraft {
    pub duration: SessionLength,
    pub reels: u32,
    pub photos: u32,
    pub monthly_plan: MonthlyPlan,
    pub social_management: bool,
    pub targeting_setup: bool,
}
