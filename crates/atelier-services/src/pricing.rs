//! Pricing engine
//!
//! Pure quote calculation: identical inputs always produce an identical
//! quote. There are two mutually exclusive modes. A retainer plan prices as
//! one line for the selected monthly tier; a one-off session prices as the
//! duration tier plus per-unit deliverable lines. Add-ons apply in both
//! modes. The one-time discount is floored to a whole unit and applies only
//! while the customer is still eligible.

use rust_decimal::Decimal;

use atelier_core::models::{
    DiscountPolicy, PackageDraft, PriceQuote, PricingTable, PromoState, QuoteLine,
};

/// Compute a price quote for a package draft
///
/// In retainer mode the duration/reels/photos fields are ignored regardless
/// of their stored values.
pub fn calc(
    draft: &PackageDraft,
    pricing: &PricingTable,
    discount: &DiscountPolicy,
    promo: &PromoState,
) -> PriceQuote {
    let mut lines = Vec::new();

    if let Some(price) = pricing.monthly_price(draft.monthly_plan) {
        lines.push(QuoteLine::new(
            format!("Monthly plan ({})", draft.monthly_plan),
            price,
        ));
    } else {
        lines.push(QuoteLine::new(
            format!("Session {}", draft.duration),
            pricing.duration_price(draft.duration),
        ));

        if draft.reels > 0 {
            lines.push(QuoteLine::new(
                format!("Reels x{}", draft.reels),
                pricing.per_reel * Decimal::from(draft.reels),
            ));
        }

        if draft.photos > 0 {
            lines.push(QuoteLine::new(
                format!("Photos x{}", draft.photos),
                pricing.per_photo * Decimal::from(draft.photos),
            ));
        }
    }

    if draft.social_management {
        lines.push(QuoteLine::new(
            "Social media management",
            pricing.social_management,
        ));
    }

    if draft.targeting_setup {
        lines.push(QuoteLine::new("Targeting setup", pricing.targeting_setup));
    }

    let subtotal: Decimal = lines.iter().map(|l| l.amount).sum();

    // Clamp so a misconfigured percent above 100 can never push the total
    // below zero.
    let discount_amount = if discount.enabled && promo.discount_eligible() {
        floor_percent(subtotal, discount.percent).min(subtotal)
    } else {
        Decimal::ZERO
    };

    PriceQuote {
        lines,
        subtotal,
        discount_amount,
        total: subtotal - discount_amount,
        currency_symbol: pricing.currency_symbol.clone(),
    }
}

/// `floor(amount * percent / 100)` with integer floor semantics
fn floor_percent(amount: Decimal, percent: u32) -> Decimal {
    (amount * Decimal::from(percent) / Decimal::from(100)).floor()
}
