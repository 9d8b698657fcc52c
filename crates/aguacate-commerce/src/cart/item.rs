//! Cart line items.

use crate::catalog::{ProductSnapshot, VariantSnapshot};
use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Identity of a line item: the product plus the selected variant, if
/// any. A product with a variant and the same product without one are
/// distinct lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Product identifier.
    pub product: ProductId,
    /// Variant identifier, when a variant was selected.
    pub variant: Option<VariantId>,
}

impl LineKey {
    /// Key for a product without variant.
    pub fn simple(product: ProductId) -> Self {
        Self {
            product,
            variant: None,
        }
    }

    /// Key for a product/variant pair.
    pub fn with_variant(product: ProductId, variant: VariantId) -> Self {
        Self {
            product,
            variant: Some(variant),
        }
    }
}

/// What exactly was added to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemKind {
    /// The plain product.
    Simple,
    /// A specific variant of the product.
    Variant {
        /// The selected variant snapshot.
        variant: VariantSnapshot,
    },
}

/// A line in the cart.
///
/// Holds a frozen product snapshot and the unit price in effect at add
/// time; neither tracks later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Frozen product snapshot.
    pub product: ProductSnapshot,
    /// Simple product or selected variant.
    pub kind: LineItemKind,
    /// Quantity, always >= 1.
    pub quantity: i64,
    /// Unit price frozen at add time.
    pub unit_price: Money,
}

impl LineItem {
    /// Create a line item, resolving the unit price: variant price if a
    /// variant is selected, else the product's effective price
    /// (promotional price when lower, list price otherwise).
    pub fn new(product: ProductSnapshot, variant: Option<VariantSnapshot>, quantity: i64) -> Self {
        let (kind, unit_price) = match variant {
            Some(v) => {
                let price = v.price;
                (LineItemKind::Variant { variant: v }, price)
            }
            None => (LineItemKind::Simple, product.effective_unit_price()),
        };
        Self {
            product,
            kind,
            quantity,
            unit_price,
        }
    }

    /// The identity key for merge and removal.
    pub fn key(&self) -> LineKey {
        LineKey {
            product: self.product.id.clone(),
            variant: self.variant().map(|v| v.id.clone()),
        }
    }

    /// The selected variant, if any.
    pub fn variant(&self) -> Option<&VariantSnapshot> {
        match &self.kind {
            LineItemKind::Simple => None,
            LineItemKind::Variant { variant } => Some(variant),
        }
    }

    /// Display name ("Aguacate Hass — Maduración: Lista para comer").
    pub fn display_name(&self) -> String {
        match self.variant() {
            Some(v) => format!("{} — {}", self.product.name, v.label()),
            None => self.product.name.clone(),
        }
    }

    /// Line total with overflow checking, for mutation-time validation.
    pub fn try_line_total(&self) -> Option<Money> {
        self.unit_price.try_multiply(self.quantity)
    }

    /// Line total for derived reads. Saturates instead of failing so
    /// totals stay defined.
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductSnapshot {
        ProductSnapshot::new(ProductId::new("hass-1"), "Aguacate Hass", Money::pesos(4500))
    }

    fn variant() -> VariantSnapshot {
        VariantSnapshot::new(
            VariantId::new("var-1"),
            "Tamaño",
            "Grande",
            Money::pesos(5200),
        )
    }

    #[test]
    fn test_simple_item_uses_effective_price() {
        let item = LineItem::new(
            product().with_discount_price(Money::pesos(3900)),
            None,
            2,
        );
        assert_eq!(item.unit_price, Money::pesos(3900));
        assert_eq!(item.line_total(), Money::pesos(7800));
    }

    #[test]
    fn test_variant_item_uses_variant_price() {
        let item = LineItem::new(
            product().with_discount_price(Money::pesos(3900)),
            Some(variant()),
            1,
        );
        assert_eq!(item.unit_price, Money::pesos(5200));
    }

    #[test]
    fn test_keys_distinguish_variants() {
        let simple = LineItem::new(product(), None, 1);
        let with_variant = LineItem::new(product(), Some(variant()), 1);
        assert_ne!(simple.key(), with_variant.key());
        assert_eq!(simple.key(), LineKey::simple(ProductId::new("hass-1")));
    }

    #[test]
    fn test_display_name() {
        let item = LineItem::new(product(), Some(variant()), 1);
        assert_eq!(item.display_name(), "Aguacate Hass — Tamaño: Grande");
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut item = LineItem::new(product(), None, 1);
        // Catalog price changes after the fact must not leak into the line.
        item.product.price = Money::pesos(9900);
        assert_eq!(item.unit_price, Money::pesos(4500));
    }
}
