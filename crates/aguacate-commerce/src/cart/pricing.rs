//! Cart totals breakdown.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The totals every checkout surface renders. Fully derived from cart
/// state; all fields are always defined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of line totals before any discount.
    pub subtotal: Money,
    /// Coupon discount (zero when no coupon, or a dormant one).
    pub discount: Money,
    /// Shipping charged (zero when waived).
    pub shipping: Money,
    /// `max(0, subtotal - discount + shipping)`.
    pub total: Money,
}

impl CartTotals {
    /// An empty-cart breakdown with the flat shipping rate.
    pub fn empty(currency: crate::money::Currency, shipping: Money) -> Self {
        let zero = Money::zero(currency);
        Self {
            subtotal: zero,
            discount: zero,
            shipping,
            total: shipping,
        }
    }

    /// Whether a discount is being applied.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Discount as a share of the subtotal, for display.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_minor == 0 {
            return 0.0;
        }
        (self.discount.amount_minor as f64 / self.subtotal.amount_minor as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_discount_percentage() {
        let totals = CartTotals {
            subtotal: Money::pesos(10000),
            discount: Money::pesos(1000),
            shipping: Money::pesos(7400),
            total: Money::pesos(16400),
        };
        assert!((totals.discount_percentage() - 10.0).abs() < 0.01);
        assert!(totals.has_discount());
    }

    #[test]
    fn test_empty_totals() {
        let totals = CartTotals::empty(Currency::COP, Money::pesos(7400));
        assert!(totals.subtotal.is_zero());
        assert_eq!(totals.total, Money::pesos(7400));
        assert_eq!(totals.discount_percentage(), 0.0);
    }
}
