//! Domain models for the reservation and pricing workflow

pub mod hold;
pub mod package;
pub mod promo;
pub mod quote;
pub mod slot;

pub use hold::{HoldOutcome, HoldRequest};
pub use package::{MonthlyPlan, PackageDraft, SessionLength};
pub use promo::PromoState;
pub use quote::{DiscountPolicy, PriceQuote, PricingTable, QuoteLine};
pub use slot::{AvailabilityOutcome, SlotQuery};
