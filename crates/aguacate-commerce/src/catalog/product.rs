//! Product and variant snapshots.
//!
//! The cart never owns catalog rows; it freezes a copy of the fields it
//! needs at add time. Later catalog edits do not retroactively change
//! lines already in a cart.

use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A frozen copy of a catalog product, captured when an item enters the
/// cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// List price.
    pub price: Money,
    /// Promotional price, when the product is on sale.
    pub discount_price: Option<Money>,
    /// Units in stock at snapshot time.
    pub stock: i64,
    /// Stock held for pending orders.
    pub reserved_stock: i64,
    /// Selling unit ("kg", "unidad", "malla").
    pub unit: String,
    /// Minimum order quantity.
    pub min_quantity: i64,
}

impl ProductSnapshot {
    /// Create a snapshot with sensible defaults for the optional fields.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            discount_price: None,
            stock: 0,
            reserved_stock: 0,
            unit: "unidad".to_string(),
            min_quantity: 1,
        }
    }

    /// Set the promotional price.
    pub fn with_discount_price(mut self, price: Money) -> Self {
        self.discount_price = Some(price);
        self
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// The unit price the cart charges for this product when no variant
    /// is selected: the promotional price if present and actually lower,
    /// else the list price.
    pub fn effective_unit_price(&self) -> Money {
        match self.discount_price {
            Some(dp) if dp.amount_minor < self.price.amount_minor => dp,
            _ => self.price,
        }
    }

    /// Check if the product is on sale.
    pub fn is_on_sale(&self) -> bool {
        self.discount_price
            .map(|dp| dp.amount_minor < self.price.amount_minor)
            .unwrap_or(false)
    }

    /// Stock not held for pending orders.
    pub fn available_stock(&self) -> i64 {
        (self.stock - self.reserved_stock).max(0)
    }

    /// Check if any stock is available.
    pub fn is_in_stock(&self) -> bool {
        self.available_stock() > 0
    }

    /// Check if a quantity could be ordered.
    ///
    /// This is a convenience for calling surfaces; the cart engine does
    /// not enforce stock.
    pub fn can_order(&self, quantity: i64) -> bool {
        quantity >= self.min_quantity.max(1) && quantity <= self.available_stock()
    }
}

/// A frozen copy of a product variant ("Maduración: Lista para comer").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantSnapshot {
    /// Variant identifier.
    pub id: VariantId,
    /// Option name (e.g., "Maduración", "Tamaño").
    pub variant_name: String,
    /// Option value (e.g., "Lista para comer", "Grande").
    pub variant_value: String,
    /// Resolved price for this variant.
    pub price: Money,
}

impl VariantSnapshot {
    /// Create a variant snapshot.
    pub fn new(
        id: VariantId,
        variant_name: impl Into<String>,
        variant_value: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            variant_name: variant_name.into(),
            variant_value: variant_value.into(),
            price,
        }
    }

    /// Display label ("Maduración: Lista para comer").
    pub fn label(&self) -> String {
        format!("{}: {}", self.variant_name, self.variant_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: i64, discount: Option<i64>) -> ProductSnapshot {
        let mut p = ProductSnapshot::new(ProductId::new("hass-1"), "Aguacate Hass", Money::pesos(price));
        p.discount_price = discount.map(Money::pesos);
        p
    }

    #[test]
    fn test_effective_price_prefers_lower_discount() {
        assert_eq!(snapshot(4500, Some(3900)).effective_unit_price(), Money::pesos(3900));
    }

    #[test]
    fn test_effective_price_ignores_higher_discount() {
        // A stale "discount" above the list price must not win.
        assert_eq!(snapshot(4500, Some(5000)).effective_unit_price(), Money::pesos(4500));
    }

    #[test]
    fn test_effective_price_without_discount() {
        assert_eq!(snapshot(4500, None).effective_unit_price(), Money::pesos(4500));
    }

    #[test]
    fn test_available_stock_accounts_for_reservations() {
        let mut p = snapshot(4500, None).with_stock(10);
        p.reserved_stock = 4;
        assert_eq!(p.available_stock(), 6);
        assert!(p.can_order(6));
        assert!(!p.can_order(7));
    }

    #[test]
    fn test_min_quantity_gate() {
        let mut p = snapshot(4500, None).with_stock(20);
        p.min_quantity = 3;
        assert!(!p.can_order(2));
        assert!(p.can_order(3));
    }

    #[test]
    fn test_variant_label() {
        let v = VariantSnapshot::new(
            VariantId::new("var-1"),
            "Maduración",
            "Lista para comer",
            Money::pesos(5200),
        );
        assert_eq!(v.label(), "Maduración: Lista para comer");
    }
}
