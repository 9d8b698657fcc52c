//! Order types.
//!
//! The cart session produces the totals; this module freezes them, with
//! the line items and customer contact, into the payload the order
//! backend persists. The session is cleared only after the caller
//! reports a successful placement.

use crate::cart::{CartSession, CartTotals};
use crate::error::CommerceError;
use crate::ids::{OrderId, OrderLineItemId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order lifecycle status, as the back-office drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed by the store.
    Confirmed,
    /// Being prepared.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Payment completed.
    Completed,
    /// Payment failed.
    Failed,
    /// Payment refunded.
    Refunded,
}

/// Customer contact captured at checkout. Works for guests and
/// registered customers alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    /// Full name.
    pub full_name: String,
    /// Email, when the customer provides one (used for one-per-customer
    /// coupon checks).
    pub email: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// Delivery address.
    pub address: String,
    /// Delivery city.
    pub city: String,
    /// Delivery notes.
    pub notes: Option<String>,
}

/// A line in a placed order: the cart line frozen once more, with the
/// line subtotal made explicit for the back-office.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Unique line identifier.
    pub id: OrderLineItemId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Variant ordered, if any.
    pub variant_id: Option<VariantId>,
    /// Display name at order time.
    pub name: String,
    /// Selling unit ("kg", "unidad").
    pub unit: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at order time.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub subtotal: Money,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number ("ORD-…").
    pub order_number: String,
    /// Order status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Customer contact.
    pub customer: CustomerInfo,
    /// Items ordered.
    pub line_items: Vec<OrderLineItem>,
    /// Totals frozen at placement.
    pub totals: CartTotals,
    /// Coupon code redeemed, if any.
    pub coupon_code: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
    /// Unix timestamp when cancelled, if applicable.
    pub cancelled_at: Option<i64>,
}

impl Order {
    /// Build the order payload from the current cart session.
    ///
    /// Fails on an empty cart or missing contact fields; the session is
    /// left untouched either way. Call [`CartSession::clear`] once the
    /// backend confirms the placement.
    pub fn from_session(
        session: &CartSession,
        customer: CustomerInfo,
    ) -> Result<Self, CommerceError> {
        if session.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if customer.full_name.trim().is_empty() {
            return Err(CommerceError::OrderIncomplete("full_name"));
        }
        if customer.phone.trim().is_empty() {
            return Err(CommerceError::OrderIncomplete("phone"));
        }
        if customer.address.trim().is_empty() {
            return Err(CommerceError::OrderIncomplete("address"));
        }

        let line_items = session
            .items()
            .iter()
            .map(|item| OrderLineItem {
                id: OrderLineItemId::generate(),
                product_id: item.product.id.clone(),
                variant_id: item.variant().map(|v| v.id.clone()),
                name: item.display_name(),
                unit: item.product.unit.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.line_total(),
            })
            .collect();

        let now = current_timestamp();
        Ok(Self {
            id: OrderId::generate(),
            order_number: Self::generate_order_number(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            customer,
            line_items,
            totals: session.totals(),
            coupon_code: session
                .applied_coupon()
                .map(|c| c.terms.code.as_str().to_string()),
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        })
    }

    /// Generate a new order number.
    pub fn generate_order_number() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("ORD-{}", ts)
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Update order status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = current_timestamp();
    }

    /// Cancel the order if its status allows it.
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(current_timestamp());
        self.updated_at = current_timestamp();
        true
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
