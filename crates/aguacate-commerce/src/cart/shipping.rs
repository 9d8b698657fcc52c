//! Shipping quotes, business constants, and response sanitization.
//!
//! Remote quote responses are never trusted field-by-field: each field is
//! independently coerced with a safe fallback so a malformed upstream can
//! never break totals derivation.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shipping business constants. Shipped with the storefront's defaults
/// but loadable from configuration, never hardcoded at call sites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShippingConfig {
    /// Subtotal above which shipping is waived, in minor units.
    pub free_shipping_min: i64,
    /// Flat shipping cost, in minor units.
    pub default_cost: i64,
    /// Estimated delivery days for the flat rate.
    pub default_estimated_days: i64,
    /// Destination assumed when the caller does not pass one.
    pub default_location: String,
    /// Currency the thresholds are expressed in.
    pub currency: Currency,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_shipping_min: 68_900,
            default_cost: 7_400,
            default_estimated_days: 1,
            default_location: "Bogotá".to_string(),
            currency: Currency::COP,
        }
    }
}

impl ShippingConfig {
    /// Parse from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, CommerceError> {
        toml::from_str(s).map_err(|e| CommerceError::InvalidConfig(e.to_string()))
    }

    /// The free-shipping threshold as Money.
    pub fn free_shipping_min_money(&self) -> Money {
        Money::new(self.free_shipping_min, self.currency)
    }

    /// The flat cost as Money.
    pub fn default_cost_money(&self) -> Money {
        Money::new(self.default_cost, self.currency)
    }
}

/// A resolved shipping quote. Always present on a cart; never null after
/// initialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuote {
    /// Shipping cost.
    pub cost: Money,
    /// Whether shipping is waived for the quoted subtotal.
    pub free_shipping: bool,
    /// Threshold above which shipping is waived.
    pub free_shipping_min: Money,
    /// How much more the customer must add to reach free shipping.
    /// Always `max(0, free_shipping_min - subtotal)`.
    pub amount_for_free_shipping: Money,
    /// Estimated delivery days.
    pub estimated_days: i64,
    /// Customer-facing status line.
    pub message: String,
}

impl ShippingQuote {
    /// The conservative local quote: flat rate below the threshold, free
    /// above it. Used before any remote quote resolves and whenever one
    /// fails.
    pub fn fallback(config: &ShippingConfig, subtotal: Money) -> Self {
        let threshold = config.free_shipping_min_money();
        // Strict comparison: the threshold itself still pays shipping.
        let free_shipping = subtotal.amount_minor > threshold.amount_minor;
        let cost = if free_shipping {
            Money::zero(config.currency)
        } else {
            config.default_cost_money()
        };
        Self {
            cost,
            free_shipping,
            free_shipping_min: threshold,
            amount_for_free_shipping: amount_for_free_shipping(threshold, subtotal),
            estimated_days: if free_shipping {
                2
            } else {
                config.default_estimated_days
            },
            message: default_message(free_shipping, cost),
        }
    }
}

/// The untrusted remote quote shape. Every field is a raw JSON value;
/// [`RawShippingQuote::sanitize`] is the only way to turn it into a
/// usable [`ShippingQuote`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawShippingQuote {
    /// Claimed cost.
    #[serde(default)]
    pub cost: Value,
    /// Claimed free-shipping flag.
    #[serde(default, rename = "freeShipping")]
    pub free_shipping: Value,
    /// Claimed threshold.
    #[serde(default, rename = "freeShippingMin")]
    pub free_shipping_min: Value,
    /// Claimed remaining amount. Never trusted; always recomputed.
    #[serde(default, rename = "amountForFreeShipping")]
    pub amount_for_free_shipping: Value,
    /// Claimed delivery estimate.
    #[serde(default, rename = "estimatedDays")]
    pub estimated_days: Value,
    /// Claimed status message.
    #[serde(default)]
    pub message: Value,
}

impl RawShippingQuote {
    /// Coerce each field independently, falling back per field to the
    /// configured defaults. `amount_for_free_shipping` is recomputed
    /// from the sanitized threshold rather than taken from the response,
    /// so its invariant holds regardless of upstream correctness.
    pub fn sanitize(&self, subtotal: Money, config: &ShippingConfig) -> ShippingQuote {
        let currency = config.currency;

        let cost = non_negative_number(&self.cost)
            .map(|v| Money::from_decimal(v, currency))
            .unwrap_or_else(|| config.default_cost_money());

        let free_shipping = js_truthy(&self.free_shipping);

        let free_shipping_min = non_negative_number(&self.free_shipping_min)
            .map(|v| Money::from_decimal(v, currency))
            .unwrap_or_else(|| config.free_shipping_min_money());

        let estimated_days = self
            .estimated_days
            .as_i64()
            .filter(|d| *d > 0)
            .unwrap_or(config.default_estimated_days);

        let message = self
            .message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| default_message(free_shipping, cost));

        ShippingQuote {
            cost,
            free_shipping,
            free_shipping_min,
            amount_for_free_shipping: amount_for_free_shipping(free_shipping_min, subtotal),
            estimated_days,
            message,
        }
    }
}

/// `max(0, threshold - subtotal)`.
fn amount_for_free_shipping(threshold: Money, subtotal: Money) -> Money {
    threshold.saturating_sub(&subtotal).floor_at_zero()
}

/// Status line shown under the cart total.
fn default_message(free_shipping: bool, cost: Money) -> String {
    if free_shipping {
        "¡Envío GRATIS en tu pedido!".to_string()
    } else {
        format!("Envío: {}", cost.display())
    }
}

/// A finite, non-negative number, if the value holds one.
fn non_negative_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v >= 0.0)
}

/// JavaScript-style truthiness, which is how the observed storefront
/// coerced the flag ("true" the string counts as set).
fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ShippingConfig {
        ShippingConfig::default()
    }

    #[test]
    fn test_fallback_below_threshold() {
        let quote = ShippingQuote::fallback(&config(), Money::pesos(9000));
        assert_eq!(quote.cost, Money::pesos(7400));
        assert!(!quote.free_shipping);
        assert_eq!(quote.amount_for_free_shipping, Money::pesos(59900));
        assert_eq!(quote.estimated_days, 1);
        assert_eq!(quote.message, "Envío: $7.400");
    }

    #[test]
    fn test_fallback_above_threshold_is_free() {
        let quote = ShippingQuote::fallback(&config(), Money::pesos(70000));
        assert!(quote.free_shipping);
        assert!(quote.cost.is_zero());
        assert_eq!(quote.amount_for_free_shipping, Money::pesos(0));
        assert_eq!(quote.message, "¡Envío GRATIS en tu pedido!");
    }

    #[test]
    fn test_fallback_threshold_is_strict() {
        // Exactly at the threshold still pays shipping.
        let quote = ShippingQuote::fallback(&config(), Money::pesos(68900));
        assert!(!quote.free_shipping);
        assert_eq!(quote.cost, Money::pesos(7400));
    }

    #[test]
    fn test_sanitize_well_formed_response() {
        let raw: RawShippingQuote = serde_json::from_value(json!({
            "cost": 7400,
            "freeShipping": false,
            "freeShippingMin": 68900,
            "amountForFreeShipping": 59900,
            "estimatedDays": 1,
            "message": "Envío: $7.400"
        }))
        .unwrap();
        let quote = raw.sanitize(Money::pesos(9000), &config());
        assert_eq!(quote.cost, Money::pesos(7400));
        assert!(!quote.free_shipping);
        assert_eq!(quote.estimated_days, 1);
    }

    #[test]
    fn test_sanitize_malformed_fields() {
        // A hostile response: string cost, string flag, null message,
        // missing numbers.
        let raw: RawShippingQuote = serde_json::from_value(json!({
            "cost": "bad",
            "freeShipping": "true",
            "message": null
        }))
        .unwrap();
        let quote = raw.sanitize(Money::pesos(9000), &config());
        assert_eq!(quote.cost, Money::pesos(7400));
        assert!(quote.free_shipping);
        assert_eq!(quote.free_shipping_min, Money::pesos(68900));
        assert_eq!(quote.amount_for_free_shipping, Money::pesos(59900));
        assert_eq!(quote.estimated_days, 1);
        assert_eq!(quote.message, "¡Envío GRATIS en tu pedido!");
    }

    #[test]
    fn test_sanitize_rejects_negative_and_non_finite_cost() {
        for bad in [json!(-500), json!(f64::NAN), json!("7400")] {
            let raw = RawShippingQuote {
                cost: bad,
                ..Default::default()
            };
            let quote = raw.sanitize(Money::pesos(1000), &config());
            assert_eq!(quote.cost, Money::pesos(7400));
        }
    }

    #[test]
    fn test_sanitize_never_trusts_remaining_amount() {
        let raw: RawShippingQuote = serde_json::from_value(json!({
            "freeShippingMin": 68900,
            "amountForFreeShipping": 999999
        }))
        .unwrap();
        let quote = raw.sanitize(Money::pesos(60000), &config());
        assert_eq!(quote.amount_for_free_shipping, Money::pesos(8900));
    }

    #[test]
    fn test_amount_for_free_shipping_never_negative() {
        let raw = RawShippingQuote::default();
        let quote = raw.sanitize(Money::pesos(500000), &config());
        assert_eq!(quote.amount_for_free_shipping, Money::pesos(0));
    }

    #[test]
    fn test_config_from_toml() {
        let cfg = ShippingConfig::from_toml_str(
            r#"
            free_shipping_min = 80000
            default_cost = 9000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.free_shipping_min, 80000);
        assert_eq!(cfg.default_cost, 9000);
        // Unspecified fields keep storefront defaults.
        assert_eq!(cfg.default_estimated_days, 1);
        assert_eq!(cfg.default_location, "Bogotá");
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        assert!(ShippingConfig::from_toml_str("free_shipping_min = \"mucho\"").is_err());
    }
}
