//! Redis key construction for promo state
//!
//! Keys are namespaced per concern so a shared Redis instance stays
//! navigable.

/// Key prefix for the first-order discount flag
pub const FIRST_ORDER_PREFIX: &str = "promo:first_order:";

/// Key for a customer's first-order flag
pub fn first_order(customer_key: &str) -> String {
    format!("{}{}", FIRST_ORDER_PREFIX, customer_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order_key() {
        assert_eq!(first_order("cust-123"), "promo:first_order:cust-123");
    }
}
