//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
///
/// Derived read paths (subtotal, totals, item count) never produce these;
/// they are reserved for mutations and payload assembly.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Coupon code does not match the accepted format.
    #[error("Invalid coupon code format: {0}")]
    InvalidCouponCode(String),

    /// The cart is empty where items are required.
    #[error("Cart is empty")]
    EmptyCart,

    /// Missing customer contact data for an order payload.
    #[error("Order incomplete: missing {0}")]
    OrderIncomplete(&'static str),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
