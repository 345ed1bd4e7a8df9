//! Sizing invariants over random budgets and prices

use gate_market_buy::strategy::{size_order, MIN_ORDER_VALUE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn budget_at_or_above_minimum_is_kept(budget in MIN_ORDER_VALUE..1_000_000.0f64, price in 1e-6..1e6f64) {
        let amount = size_order(budget, price, MIN_ORDER_VALUE).unwrap();
        prop_assume!((budget / price) * price >= MIN_ORDER_VALUE);
        prop_assert_eq!(amount, budget / price);
    }

    #[test]
    fn budget_below_minimum_buys_minimum_value(budget in 0.0..MIN_ORDER_VALUE, price in 1e-6..1e6f64) {
        let amount = size_order(budget, price, MIN_ORDER_VALUE).unwrap();
        prop_assume!((budget / price) * price < MIN_ORDER_VALUE);
        prop_assert_eq!(amount, MIN_ORDER_VALUE / price);
        prop_assert!((amount * price - MIN_ORDER_VALUE).abs() <= 1e-9 * MIN_ORDER_VALUE);
    }

    #[test]
    fn notional_never_below_minimum(budget in 0.0..1_000.0f64, price in 1e-4..1e5f64) {
        let amount = size_order(budget, price, MIN_ORDER_VALUE).unwrap();
        prop_assert!(amount * price >= MIN_ORDER_VALUE * (1.0 - 1e-12));
        prop_assert!(amount >= (budget / price) * (1.0 - 1e-12));
    }
}
