//! Promo eligibility state
//!
//! The only state that outlives a session: whether this customer has already
//! consumed the one-time first-order discount. Read once at session start,
//! written at most once, on the first successful hold.

use serde::{Deserialize, Serialize};

/// Durable per-customer promo flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PromoState {
    pub first_order_used: bool,
}

impl PromoState {
    pub const fn fresh() -> Self {
        Self {
            first_order_used: false,
        }
    }

    pub const fn used() -> Self {
        Self {
            first_order_used: true,
        }
    }

    /// Whether the first-order discount can still be applied
    pub fn discount_eligible(&self) -> bool {
        !self.first_order_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility() {
        assert!(PromoState::fresh().discount_eligible());
        assert!(!PromoState::used().discount_eligible());
        assert_eq!(PromoState::default(), PromoState::fresh());
    }
}
