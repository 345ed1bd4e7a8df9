//! Order sizing for quote-budgeted market buys

use thiserror::Error;

use crate::api::GatewayError;

/// Smallest order value (in quote currency) the exchange accepts
pub const MIN_ORDER_VALUE: f64 = 3.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("price unavailable: {0}")]
    PriceUnavailable(#[from] GatewayError),

    #[error("invalid price {0}")]
    InvalidPrice(f64),
}

/// Order sized against one observed price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedOrder {
    /// Base amount to buy
    pub amount: f64,
    /// Price the amount was computed at
    pub price: f64,
    /// `budget / price` was worth less than the minimum and got raised
    pub raised_to_minimum: bool,
}

impl SizedOrder {
    /// Quote value of the order at its sizing price
    pub fn notional(&self) -> f64 {
        self.amount * self.price
    }
}

/// Size a buy of `budget` quote currency at `price`.
///
/// When `budget / price` is worth less than `min_order_value` the amount is
/// raised to `min_order_value / price`, so the spend can exceed `budget`.
/// No lot or tick rounding happens here.
pub fn plan_order(budget: f64, price: f64, min_order_value: f64) -> Result<SizedOrder, SizingError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(SizingError::InvalidPrice(price));
    }

    let amount = budget / price;
    if amount * price < min_order_value {
        return Ok(SizedOrder {
            amount: min_order_value / price,
            price,
            raised_to_minimum: true,
        });
    }

    Ok(SizedOrder {
        amount,
        price,
        raised_to_minimum: false,
    })
}

/// Base amount to buy for `budget` at `price`, see [`plan_order`]
pub fn size_order(budget: f64, price: f64, min_order_value: f64) -> Result<f64, SizingError> {
    plan_order(budget, price, min_order_value).map(|sized| sized.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_above_minimum_is_unchanged() {
        let amount = size_order(10.0, 2.0, MIN_ORDER_VALUE).unwrap();
        assert!((amount - 5.0).abs() < 1e-12);

        for (budget, price) in [(3.0, 0.5), (250.0, 31_000.0), (12.0, 0.000_42)] {
            let amount = size_order(budget, price, MIN_ORDER_VALUE).unwrap();
            assert!((amount - budget / price).abs() <= 1e-9 * (budget / price));
        }
    }

    #[test]
    fn test_budget_below_minimum_is_raised() {
        let amount = size_order(1.0, 2.0, MIN_ORDER_VALUE).unwrap();
        assert!((amount - 1.5).abs() < 1e-12);

        for (budget, price) in [(0.0, 2.0), (2.99, 17.0), (0.5, 0.000_3)] {
            let amount = size_order(budget, price, MIN_ORDER_VALUE).unwrap();
            assert!((amount * price - MIN_ORDER_VALUE).abs() < 1e-9);
        }
    }

    #[test]
    fn test_plan_flags_raised_orders() {
        let sized = plan_order(10.0, 2.0, MIN_ORDER_VALUE).unwrap();
        assert!(!sized.raised_to_minimum);
        assert_eq!(sized.price, 2.0);
        assert!((sized.notional() - 10.0).abs() < 1e-12);

        let sized = plan_order(1.0, 2.0, MIN_ORDER_VALUE).unwrap();
        assert!(sized.raised_to_minimum);
        assert!((sized.notional() - MIN_ORDER_VALUE).abs() < 1e-12);

        // exactly at the minimum is not a raise
        let sized = plan_order(3.0, 3.0, MIN_ORDER_VALUE).unwrap();
        assert!(!sized.raised_to_minimum);
    }

    #[test]
    fn test_rejects_unusable_price() {
        assert_eq!(size_order(10.0, 0.0, 3.0), Err(SizingError::InvalidPrice(0.0)));
        assert!(matches!(size_order(10.0, -1.0, 3.0), Err(SizingError::InvalidPrice(_))));
        assert!(matches!(size_order(10.0, f64::NAN, 3.0), Err(SizingError::InvalidPrice(_))));
    }
}
