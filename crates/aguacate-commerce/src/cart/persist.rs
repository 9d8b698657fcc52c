//! The persisted cart record.
//!
//! One namespaced record holds the whole cart: line items, coupon terms,
//! and the last shipping quote. The record carries a schema version so
//! the line-item shape can change without stranding returning visitors.

use crate::cart::coupon::CouponTerms;
use crate::cart::item::LineItem;
use crate::cart::shipping::ShippingQuote;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current persisted schema version.
pub const CART_RECORD_VERSION: u32 = 1;

/// The serialized cart state, reloaded verbatim on the next visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartRecord {
    /// Schema version of this record.
    pub version: u32,
    /// Line items.
    pub items: Vec<LineItem>,
    /// Applied coupon terms, if any. The discount amount is derived, so
    /// only the terms are stored.
    pub coupon: Option<CouponTerms>,
    /// Last known shipping quote.
    pub shipping: ShippingQuote,
}

impl CartRecord {
    /// Build a current-version record.
    pub fn new(items: Vec<LineItem>, coupon: Option<CouponTerms>, shipping: ShippingQuote) -> Self {
        Self {
            version: CART_RECORD_VERSION,
            items,
            coupon,
            shipping,
        }
    }
}

/// Interpret a raw persisted value, migrating older shapes.
///
/// Returns `None` when the value is unrecognizable; callers start a
/// fresh cart rather than failing the visit.
pub fn migrate(value: Value) -> Option<CartRecord> {
    match value.get("version").and_then(Value::as_u64) {
        Some(v) if v as u32 == CART_RECORD_VERSION => serde_json::from_value(value).ok(),
        Some(_) => None,
        // Pre-versioning records stored the same fields without a tag.
        None => {
            let items = serde_json::from_value(value.get("items")?.clone()).ok()?;
            let coupon = match value.get("coupon") {
                Some(c) if !c.is_null() => Some(serde_json::from_value(c.clone()).ok()?),
                _ => None,
            };
            let shipping = serde_json::from_value(value.get("shipping")?.clone()).ok()?;
            Some(CartRecord {
                version: CART_RECORD_VERSION,
                items,
                coupon,
                shipping,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::shipping::ShippingConfig;
    use crate::money::Money;

    fn shipping() -> ShippingQuote {
        ShippingQuote::fallback(&ShippingConfig::default(), Money::pesos(0))
    }

    #[test]
    fn test_round_trip() {
        let record = CartRecord::new(Vec::new(), None, shipping());
        let value = serde_json::to_value(&record).unwrap();
        let back = migrate(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_migrates_untagged_legacy_record() {
        let record = CartRecord::new(Vec::new(), None, shipping());
        let mut value = serde_json::to_value(&record).unwrap();
        value.as_object_mut().unwrap().remove("version");

        let back = migrate(value).unwrap();
        assert_eq!(back.version, CART_RECORD_VERSION);
        assert_eq!(back.shipping, record.shipping);
    }

    #[test]
    fn test_unknown_version_starts_fresh() {
        let record = CartRecord::new(Vec::new(), None, shipping());
        let mut value = serde_json::to_value(&record).unwrap();
        value["version"] = serde_json::json!(99);
        assert!(migrate(value).is_none());
    }

    #[test]
    fn test_garbage_starts_fresh() {
        assert!(migrate(serde_json::json!("not a cart")).is_none());
        assert!(migrate(serde_json::json!({"items": 12})).is_none());
    }
}
