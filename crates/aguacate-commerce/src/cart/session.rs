//! The cart session: state container and pricing engine.
//!
//! One `CartSession` owns the visitor's cart. Collaborators (coupon
//! validation, shipping quotes, client-local storage) are injected, so
//! every checkout surface shares the same derivation rules and the
//! engine stays testable on its own.

use std::sync::Arc;

use crate::backend::{CartStorage, CouponBackend, ShippingBackend};
use crate::cart::coupon::{AppliedCoupon, CouponCode, CouponTerms};
use crate::cart::item::{LineItem, LineKey};
use crate::cart::persist::CartRecord;
use crate::cart::pricing::CartTotals;
use crate::cart::shipping::{ShippingConfig, ShippingQuote};
use crate::catalog::{ProductSnapshot, VariantSnapshot};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// The shopping cart engine.
///
/// Mutations are synchronous and leave the cart fully defined; the only
/// suspending operation is [`calculate_shipping`](Self::calculate_shipping).
/// Every read derives from current state, so there is no cached value to
/// go stale.
pub struct CartSession {
    items: Vec<LineItem>,
    coupon: Option<CouponTerms>,
    shipping: ShippingQuote,
    config: ShippingConfig,
    coupons: Arc<dyn CouponBackend>,
    rates: Arc<dyn ShippingBackend>,
    storage: Arc<dyn CartStorage>,
}

impl CartSession {
    /// Open a session, restoring persisted state when a record exists.
    ///
    /// An unreadable record is dropped and the visitor starts with an
    /// empty cart; losing a cart beats blocking the storefront.
    pub fn open(
        config: ShippingConfig,
        coupons: Arc<dyn CouponBackend>,
        rates: Arc<dyn ShippingBackend>,
        storage: Arc<dyn CartStorage>,
    ) -> Self {
        let restored = match storage.load() {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "cart record unreadable, starting empty");
                None
            }
        };
        match restored {
            Some(record) => Self {
                items: record.items,
                coupon: record.coupon,
                shipping: record.shipping,
                config,
                coupons,
                rates,
                storage,
            },
            None => {
                let shipping = ShippingQuote::fallback(&config, Money::zero(config.currency));
                Self {
                    items: Vec::new(),
                    coupon: None,
                    shipping,
                    config,
                    coupons,
                    rates,
                    storage,
                }
            }
        }
    }

    /// Current line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The active coupon with its discount evaluated against the current
    /// subtotal. A dormant coupon reports a zero discount.
    pub fn applied_coupon(&self) -> Option<AppliedCoupon> {
        self.coupon
            .clone()
            .map(|terms| AppliedCoupon::evaluate(terms, self.subtotal()))
    }

    /// The current shipping quote. Always defined.
    pub fn shipping(&self) -> &ShippingQuote {
        &self.shipping
    }

    /// The shipping business constants this session runs with.
    pub fn config(&self) -> &ShippingConfig {
        &self.config
    }

    /// Add a product (or one of its variants) to the cart.
    ///
    /// The unit price is frozen now: the variant price when a variant is
    /// selected, else the promotional price when lower, else the list
    /// price. Adding a line that already exists increments its quantity
    /// instead of duplicating it. Stock is not checked here; calling
    /// surfaces gate on [`ProductSnapshot::can_order`] before adding.
    pub fn add_item(
        &mut self,
        product: &ProductSnapshot,
        variant: Option<&VariantSnapshot>,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let unit_price = match variant {
            Some(v) => v.price,
            None => product.effective_unit_price(),
        };
        if unit_price.currency != self.config.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.config.currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }

        let key = LineKey {
            product: product.id.clone(),
            variant: variant.map(|v| v.id.clone()),
        };
        if let Some(existing) = self.items.iter_mut().find(|i| i.key() == key) {
            let merged = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            existing.quantity = merged;
            existing.try_line_total().ok_or(CommerceError::Overflow)?;
        } else {
            let item = LineItem::new(product.clone(), variant.cloned(), quantity);
            item.try_line_total().ok_or(CommerceError::Overflow)?;
            self.items.push(item);
        }
        self.persist();
        Ok(())
    }

    /// Remove the line matching the key exactly.
    ///
    /// Passing no variant removes only the no-variant line for that
    /// product; variant-bearing lines of the same product are untouched.
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        let key = LineKey {
            product: product_id.clone(),
            variant: variant_id.cloned(),
        };
        let before = self.items.len();
        self.items.retain(|i| i.key() != key);
        let removed = self.items.len() < before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Replace a line's quantity. A quantity of zero or less removes the
    /// line. No upper bound is enforced; stock capping is the caller's
    /// concern. Returns whether a line was affected.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        variant_id: Option<&VariantId>,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id, variant_id));
        }
        let key = LineKey {
            product: product_id.clone(),
            variant: variant_id.cloned(),
        };
        if let Some(item) = self.items.iter_mut().find(|i| i.key() == key) {
            item.quantity = quantity;
            item.try_line_total().ok_or(CommerceError::Overflow)?;
            self.persist();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Empty the cart: items, coupon, and the persisted record go; the
    /// shipping quote resets to the local default so it is never left
    /// undefined. Called after a successful order placement.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
        self.shipping = ShippingQuote::fallback(&self.config, Money::zero(self.config.currency));
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear persisted cart");
        }
    }

    /// Apply a coupon code.
    ///
    /// The code is trimmed and uppercased, then the validation backend
    /// decides eligibility against the current subtotal and optional
    /// customer email. On success the new coupon replaces any previous
    /// one in a single step; on rejection the existing coupon is left
    /// untouched and `false` is returned so the surface can show an
    /// inline message. This method never fails the checkout.
    pub async fn apply_coupon(&mut self, code: &str, customer_email: Option<&str>) -> bool {
        let code = match CouponCode::parse(code) {
            Ok(code) => code,
            Err(_) => {
                tracing::debug!(raw = code, "coupon code rejected by format check");
                return false;
            }
        };
        let subtotal = self.subtotal();
        match self.coupons.validate(&code, subtotal, customer_email).await {
            Ok(terms) => {
                self.coupon = Some(terms);
                self.persist();
                true
            }
            Err(rejection) => {
                tracing::debug!(%code, reason = %rejection, "coupon rejected");
                false
            }
        }
    }

    /// Drop the applied coupon. A no-op when none is applied.
    pub fn remove_coupon(&mut self) {
        if self.coupon.take().is_some() {
            self.persist();
        }
    }

    /// Refresh the shipping quote for the current subtotal.
    ///
    /// A subtotal that cannot be represented (overflowing or negative)
    /// never reaches the network: the quote resets to the zero-subtotal
    /// default. Remote failures of any kind (transport, `success:
    /// false`, malformed fields) degrade to the local fallback; this
    /// method never reports an error, so the cart stays usable through a
    /// shipping-API outage. There is no retry and no request ordering:
    /// when calls overlap at the call site, the last response applied
    /// wins.
    pub async fn calculate_shipping(&mut self, location: Option<&str>) {
        let subtotal = match self.checked_subtotal() {
            Some(s) if !s.is_negative() => s,
            _ => {
                tracing::warn!("subtotal not representable, using default shipping");
                self.shipping =
                    ShippingQuote::fallback(&self.config, Money::zero(self.config.currency));
                self.persist();
                return;
            }
        };
        let location = location.unwrap_or(&self.config.default_location);

        match self.rates.quote(subtotal, location).await {
            Ok(raw) => {
                self.shipping = raw.sanitize(subtotal, &self.config);
            }
            Err(err) => {
                tracing::warn!(error = %err, %subtotal, "shipping quote failed, using fallback");
                self.shipping = ShippingQuote::fallback(&self.config, subtotal);
            }
        }
        self.persist();
    }

    /// Sum of line totals. Total: saturates rather than failing, so the
    /// checkout surfaces always get a number.
    pub fn subtotal(&self) -> Money {
        let mut acc = Money::zero(self.config.currency);
        for item in &self.items {
            acc = acc.saturating_add(&item.line_total());
        }
        acc
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// The full totals breakdown.
    ///
    /// The discount is recomputed from the coupon terms on every call,
    /// so the minimum-purchase rule keeps holding as items come and go.
    /// Shipping is zero when either the coupon or the quote waives it.
    /// Never fails; every field is a defined amount.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let discount = self
            .coupon
            .as_ref()
            .map(|terms| terms.discount_for(subtotal))
            .unwrap_or_else(|| Money::zero(self.config.currency));
        let waived = self.shipping.free_shipping
            || self.coupon.as_ref().map(|c| c.free_shipping).unwrap_or(false);
        let shipping = if waived {
            Money::zero(self.config.currency)
        } else {
            self.shipping.cost
        };
        let total = subtotal
            .saturating_sub(&discount)
            .saturating_add(&shipping)
            .floor_at_zero();
        CartTotals {
            subtotal,
            discount,
            shipping,
            total,
        }
    }

    /// Overflow-checked subtotal, the validity gate for the shipping
    /// call.
    fn checked_subtotal(&self) -> Option<Money> {
        let mut acc = Money::zero(self.config.currency);
        for item in &self.items {
            acc = acc.try_add(&item.try_line_total()?)?;
        }
        Some(acc)
    }

    /// Write the current state through the storage port. Storage
    /// failures are logged and swallowed.
    fn persist(&self) {
        let record = CartRecord::new(
            self.items.clone(),
            self.coupon.clone(),
            self.shipping.clone(),
        );
        if let Err(err) = self.storage.save(&record) {
            tracing::warn!(error = %err, "failed to persist cart");
        }
    }
}
