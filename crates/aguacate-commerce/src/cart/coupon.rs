//! Coupon terms and discount computation.
//!
//! Eligibility (expiry, usage limits, one-per-customer) is decided by the
//! validation backend; this module owns the code format and the pure
//! discount arithmetic applied against a subtotal.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coupon code length bounds.
const CODE_MIN_LEN: usize = 3;
const CODE_MAX_LEN: usize = 20;

/// A normalized coupon code: trimmed, uppercased, `A-Z 0-9 _ -`,
/// 3 to 20 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalize and validate raw user input.
    pub fn parse(raw: &str) -> Result<Self, CommerceError> {
        let code = raw.trim().to_uppercase();
        let len_ok = (CODE_MIN_LEN..=CODE_MAX_LEN).contains(&code.len());
        let chars_ok = code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !len_ok || !chars_ok {
            return Err(CommerceError::InvalidCouponCode(raw.trim().to_string()));
        }
        Ok(Self(code))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a coupon discounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percentage off the subtotal (0, 100].
    Percentage,
    /// Fixed amount off.
    Fixed,
}

/// Coupon terms as returned by the validation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponTerms {
    /// The normalized code.
    pub code: CouponCode,
    /// Display description ("10% de descuento en tu primera compra").
    pub description: Option<String>,
    /// Percentage or fixed.
    pub discount_type: DiscountKind,
    /// Percent value for percentage coupons, amount in minor units for
    /// fixed coupons.
    pub discount_value: f64,
    /// Minimum subtotal required before the coupon produces a discount.
    pub min_purchase: Money,
    /// Cap applied to percentage discounts only.
    pub max_discount: Option<Money>,
    /// Whether the coupon also waives shipping.
    pub free_shipping: bool,
}

impl CouponTerms {
    /// Compute the discount this coupon produces for a subtotal.
    ///
    /// Below the minimum purchase the coupon is dormant and produces
    /// zero. A fixed discount never exceeds the subtotal; a percentage
    /// discount never exceeds its cap.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        if subtotal.amount_minor < self.min_purchase.amount_minor {
            return Money::zero(subtotal.currency);
        }
        match self.discount_type {
            DiscountKind::Percentage => {
                let raw = subtotal.percentage(self.discount_value);
                match self.max_discount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            DiscountKind::Fixed => {
                Money::new(self.discount_value.round() as i64, subtotal.currency).min(subtotal)
            }
        }
    }

    /// Whether the coupon is applied but inactive for this subtotal.
    pub fn is_dormant(&self, subtotal: Money) -> bool {
        subtotal.amount_minor < self.min_purchase.amount_minor
    }

    /// How much more the customer must add before a dormant coupon
    /// activates. Zero once the minimum is met.
    pub fn amount_to_activate(&self, subtotal: Money) -> Money {
        self.min_purchase.saturating_sub(&subtotal).floor_at_zero()
    }
}

/// A coupon applied to the cart, with the discount derived for the
/// current subtotal. At most one exists per cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// The backend-validated terms.
    pub terms: CouponTerms,
    /// Discount for the subtotal the coupon was last evaluated against.
    pub discount_amount: Money,
}

impl AppliedCoupon {
    /// Evaluate terms against a subtotal.
    pub fn evaluate(terms: CouponTerms, subtotal: Money) -> Self {
        let discount_amount = terms.discount_for(subtotal);
        Self {
            terms,
            discount_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent_coupon(value: f64, min_purchase: i64, max_discount: Option<i64>) -> CouponTerms {
        CouponTerms {
            code: CouponCode::parse("AGUACATE10").unwrap(),
            description: None,
            discount_type: DiscountKind::Percentage,
            discount_value: value,
            min_purchase: Money::pesos(min_purchase),
            max_discount: max_discount.map(Money::pesos),
            free_shipping: false,
        }
    }

    fn fixed_coupon(value: i64, min_purchase: i64) -> CouponTerms {
        CouponTerms {
            code: CouponCode::parse("MENOS-5000").unwrap(),
            description: None,
            discount_type: DiscountKind::Fixed,
            discount_value: value as f64,
            min_purchase: Money::pesos(min_purchase),
            max_discount: None,
            free_shipping: false,
        }
    }

    #[test]
    fn test_code_normalization() {
        let code = CouponCode::parse("  bienvenida10 ").unwrap();
        assert_eq!(code.as_str(), "BIENVENIDA10");
    }

    #[test]
    fn test_code_rejects_bad_input() {
        assert!(CouponCode::parse("ab").is_err());
        assert!(CouponCode::parse("THIS-CODE-IS-FAR-TOO-LONG").is_err());
        assert!(CouponCode::parse("HOLA MUNDO").is_err());
        assert!(CouponCode::parse("CAFÉ10").is_err());
        assert!(CouponCode::parse("OK_10-X").is_ok());
    }

    #[test]
    fn test_percentage_discount() {
        let terms = percent_coupon(10.0, 0, None);
        assert_eq!(terms.discount_for(Money::pesos(10000)), Money::pesos(1000));
    }

    #[test]
    fn test_percentage_capped_at_max_discount() {
        let terms = percent_coupon(20.0, 0, Some(5000));
        assert_eq!(terms.discount_for(Money::pesos(100000)), Money::pesos(5000));
        // Below the cap the raw percentage applies.
        assert_eq!(terms.discount_for(Money::pesos(10000)), Money::pesos(2000));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let terms = fixed_coupon(15000, 0);
        assert_eq!(terms.discount_for(Money::pesos(9000)), Money::pesos(9000));
        assert_eq!(terms.discount_for(Money::pesos(40000)), Money::pesos(15000));
    }

    #[test]
    fn test_dormant_below_minimum() {
        let terms = percent_coupon(10.0, 50000, None);
        let subtotal = Money::pesos(20000);
        assert!(terms.is_dormant(subtotal));
        assert_eq!(terms.discount_for(subtotal), Money::pesos(0));
        assert_eq!(terms.amount_to_activate(subtotal), Money::pesos(30000));
    }

    #[test]
    fn test_activates_at_minimum() {
        let terms = percent_coupon(10.0, 50000, None);
        let subtotal = Money::pesos(50000);
        assert!(!terms.is_dormant(subtotal));
        assert_eq!(terms.discount_for(subtotal), Money::pesos(5000));
        assert_eq!(terms.amount_to_activate(subtotal), Money::pesos(0));
    }

    #[test]
    fn test_discount_monotone_in_subtotal() {
        let terms = percent_coupon(15.0, 10000, Some(8000));
        let mut last = Money::pesos(0);
        for subtotal in (0..120000).step_by(5000) {
            let d = terms.discount_for(Money::pesos(subtotal));
            assert!(d.amount_minor >= last.amount_minor, "not monotone at {}", subtotal);
            last = d;
        }
        // Constant once the cap is hit.
        assert_eq!(last, Money::pesos(8000));
    }

    #[test]
    fn test_applied_coupon_evaluation() {
        let applied = AppliedCoupon::evaluate(fixed_coupon(5000, 0), Money::pesos(30000));
        assert_eq!(applied.discount_amount, Money::pesos(5000));
    }
}
