//! Price quote, pricing table, and discount models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::package::{MonthlyPlan, SessionLength};

/// One line of a price quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub label: String,
    pub amount: Decimal,
}

impl QuoteLine {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A computed price quote
///
/// Invariants (checked by the pricing engine tests):
/// `subtotal == sum(lines)`, `total == subtotal - discount_amount`,
/// `0 <= discount_amount <= subtotal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub lines: Vec<QuoteLine>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub currency_symbol: String,
}

impl PriceQuote {
    /// Verify the arithmetic invariants hold
    pub fn is_consistent(&self) -> bool {
        let sum: Decimal = self.lines.iter().map(|l| l.amount).sum();
        sum == self.subtotal
            && self.total == self.subtotal - self.discount_amount
            && self.discount_amount >= Decimal::ZERO
            && self.discount_amount <= self.subtotal
    }
}

/// One-time promotional discount policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    pub enabled: bool,
    /// Whole percent, applied with integer floor
    pub percent: u32,
    pub label: String,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            percent: 10,
            label: "First order discount".to_string(),
        }
    }
}

/// Per-unit prices supplied by the pricing configuration source
///
/// Read-only input to the pricing engine: five duration tiers, per-reel and
/// per-photo rates, three monthly tiers, two add-on prices, and the currency
/// symbol to render with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTable {
    pub session_2h: Decimal,
    pub session_4h: Decimal,
    pub session_8h: Decimal,
    pub session_day: Decimal,
    pub session_week: Decimal,
    pub per_reel: Decimal,
    pub per_photo: Decimal,
    pub monthly_starter: Decimal,
    pub monthly_growth: Decimal,
    pub monthly_pro: Decimal,
    pub social_management: Decimal,
    pub targeting_setup: Decimal,
    pub currency_symbol: String,
}

impl PricingTable {
    /// Price for a duration tier (discrete lookup, no interpolation)
    pub fn duration_price(&self, length: SessionLength) -> Decimal {
        match length {
            SessionLength::TwoHours => self.session_2h,
            SessionLength::FourHours => self.session_4h,
            SessionLength::EightHours => self.session_8h,
            SessionLength::FullDay => self.session_day,
            SessionLength::FullWeek => self.session_week,
        }
    }

    /// Price for a retainer tier; `None` for the no-retainer case
    pub fn monthly_price(&self, plan: MonthlyPlan) -> Option<Decimal> {
        match plan {
            MonthlyPlan::None => None,
            MonthlyPlan::Starter => Some(self.monthly_starter),
            MonthlyPlan::Growth => Some(self.monthly_growth),
            MonthlyPlan::Pro => Some(self.monthly_pro),
        }
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            session_2h: Decimal::from(250),
            session_4h: Decimal::from(400),
            session_8h: Decimal::from(700),
            session_day: Decimal::from(900),
            session_week: Decimal::from(3500),
            per_reel: Decimal::from(50),
            per_photo: Decimal::from(10),
            monthly_starter: Decimal::from(1200),
            monthly_growth: Decimal::from(2000),
            monthly_pro: Decimal::from(3200),
            social_management: Decimal::from(400),
            targeting_setup: Decimal::from(150),
            currency_symbol: "\u{20ac}".to_string(),
        }
    }
}
