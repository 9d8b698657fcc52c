//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation to avoid floating-point
//! precision issues. The storefront prices everything in Colombian
//! pesos, which carry no decimal places in practice, so a COP amount
//! is simply a whole number of pesos.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the storefront trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Colombian peso. Displayed without decimals ("$7.400").
    #[default]
    COP,
    /// US dollar.
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "COP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::COP => "COP",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::COP => "$",
            Currency::USD => "US$",
        }
    }

    /// Get the number of decimal places for this currency.
    ///
    /// COP is treated as a zero-decimal currency: catalog prices are
    /// whole pesos.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::COP => 0,
            Currency::USD => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "COP" => Some(Currency::COP),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (whole pesos
/// for COP, cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a COP amount from whole pesos.
    pub fn pesos(amount: i64) -> Self {
        Self::new(amount, Currency::COP)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// Non-finite inputs collapse to zero rather than poisoning later
    /// arithmetic.
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        if !amount.is_finite() {
            return Self::zero(currency);
        }
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_minor = (amount * multiplier as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_minor as f64 / divisor as f64
    }

    /// Format as a display string ("$7.400" for COP, "US$49.99" for USD).
    ///
    /// Zero-decimal currencies get Colombian-style dot grouping, which
    /// the storefront's shipping messages rely on.
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format the bare amount without symbol ("7.400", "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return group_thousands(self.amount_minor);
        }
        let places = places as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Try to add another Money value, returning None on currency
    /// mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_minor.checked_add(other.amount_minor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_minor.checked_sub(other.amount_minor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_minor.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Saturating addition. Read paths use this so a derived total is
    /// always a defined number even if mutation-time checks were bypassed.
    pub fn saturating_add(&self, other: &Money) -> Money {
        Money::new(
            self.amount_minor.saturating_add(other.amount_minor),
            self.currency,
        )
    }

    /// Saturating subtraction.
    pub fn saturating_sub(&self, other: &Money) -> Money {
        Money::new(
            self.amount_minor.saturating_sub(other.amount_minor),
            self.currency,
        )
    }

    /// Saturating multiplication by a scalar.
    pub fn saturating_mul(&self, factor: i64) -> Money {
        Money::new(self.amount_minor.saturating_mul(factor), self.currency)
    }

    /// Calculate a percentage of this amount, rounded to the nearest
    /// minor unit.
    pub fn percentage(&self, percent: f64) -> Money {
        let amount = (self.amount_minor as f64 * percent / 100.0).round() as i64;
        Money::new(amount, self.currency)
    }

    /// The smaller of two amounts in the same currency.
    pub fn min(self, other: Money) -> Money {
        if other.amount_minor < self.amount_minor {
            other
        } else {
            self
        }
    }

    /// Clamp a negative amount up to zero.
    pub fn floor_at_zero(self) -> Money {
        if self.amount_minor < 0 {
            Money::zero(self.currency)
        } else {
            self
        }
    }

    /// Sum an iterator of Money values with overflow checking.
    pub fn try_sum<'a>(
        iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        let mut acc = Money::zero(currency);
        for m in iter {
            acc = acc.try_add(m)?;
        }
        Some(acc)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Group digits with dots, Colombian style (68900 -> "68.900").
fn group_thousands(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pesos_are_minor_units() {
        let m = Money::pesos(68900);
        assert_eq!(m.amount_minor, 68900);
        assert_eq!(m.currency, Currency::COP);
    }

    #[test]
    fn test_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_minor, 4999);

        let m = Money::from_decimal(7400.0, Currency::COP);
        assert_eq!(m.amount_minor, 7400);
    }

    #[test]
    fn test_from_decimal_non_finite() {
        assert!(Money::from_decimal(f64::NAN, Currency::COP).is_zero());
        assert!(Money::from_decimal(f64::INFINITY, Currency::COP).is_zero());
    }

    #[test]
    fn test_cop_display_grouping() {
        assert_eq!(Money::pesos(7400).display(), "$7.400");
        assert_eq!(Money::pesos(68900).display(), "$68.900");
        assert_eq!(Money::pesos(150).display(), "$150");
        assert_eq!(Money::pesos(1234567).display(), "$1.234.567");
    }

    #[test]
    fn test_usd_display() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.display(), "US$49.99");
    }

    #[test]
    fn test_try_add_currency_mismatch() {
        let cop = Money::pesos(1000);
        let usd = Money::new(1000, Currency::USD);
        assert_eq!(cop.try_add(&usd), None);
    }

    #[test]
    fn test_try_multiply_overflow() {
        let m = Money::pesos(i64::MAX);
        assert_eq!(m.try_multiply(2), None);
        assert!(m.try_multiply(1).is_some());
    }

    #[test]
    fn test_percentage_rounds() {
        let m = Money::pesos(10000);
        assert_eq!(m.percentage(10.0).amount_minor, 1000);
        // 15% of 333 = 49.95, rounds to 50
        assert_eq!(Money::pesos(333).percentage(15.0).amount_minor, 50);
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(Money::pesos(-500).floor_at_zero(), Money::pesos(0));
        assert_eq!(Money::pesos(500).floor_at_zero(), Money::pesos(500));
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::pesos(100), Money::pesos(250)];
        let sum = Money::try_sum(values.iter(), Currency::COP).unwrap();
        assert_eq!(sum.amount_minor, 350);

        let overflowing = [Money::pesos(i64::MAX), Money::pesos(1)];
        assert_eq!(Money::try_sum(overflowing.iter(), Currency::COP), None);
    }
}
