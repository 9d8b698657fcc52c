//! Ports to the storefront's remote collaborators.
//!
//! The engine talks to the coupon-validation API, the shipping-quote API,
//! and client-local storage exclusively through these traits, so it can
//! be unit-tested without a network or a browser.

use crate::cart::{CartRecord, CouponCode, CouponTerms, RawShippingQuote};
use crate::money::Money;
use async_trait::async_trait;
use thiserror::Error;

/// Why the coupon backend rejected a code. Messages are the inline
/// texts the storefront shows the customer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponRejection {
    /// Unknown or inactive code.
    #[error("Cupón no encontrado o inválido")]
    NotFound,

    /// Past its validity window.
    #[error("Cupón expirado")]
    Expired,

    /// Validity window has not started.
    #[error("Cupón no válido aún")]
    NotYetValid,

    /// Cart subtotal below the coupon's minimum.
    #[error("El pedido mínimo para usar este cupón es de {required}")]
    BelowMinimum {
        /// The minimum subtotal required.
        required: Money,
    },

    /// Global usage limit exhausted.
    #[error("Este cupón ha alcanzado su límite de uso")]
    UsageLimitReached,

    /// This customer already redeemed a one-per-customer coupon.
    #[error("Ya has usado este cupón anteriormente")]
    AlreadyUsed,

    /// Any other rejection, passed through from the backend verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The backend itself failed.
    #[error("Error validando el cupón: {0}")]
    Backend(String),
}

/// Shipping quote failure. The engine never surfaces these to callers;
/// they only select the fallback path.
#[derive(Error, Debug)]
pub enum ShippingError {
    /// The service answered `success: false`.
    #[error("Shipping quote rejected: {0}")]
    Rejected(String),

    /// HTTP or connection failure.
    #[error("Shipping transport error: {0}")]
    Transport(String),
}

/// Cart storage failure.
#[derive(Error, Debug)]
#[error("Cart storage error: {0}")]
pub struct StorageError(pub String);

/// Validates a coupon code against the storefront backend.
///
/// Eligibility policy (expiry, usage limits, one-per-customer welcome
/// coupons) lives behind this port, not in the engine.
#[async_trait]
pub trait CouponBackend: Send + Sync {
    /// Validate a code for the given subtotal and optional customer
    /// email; returns the coupon terms when applicable.
    async fn validate(
        &self,
        code: &CouponCode,
        subtotal: Money,
        customer_email: Option<&str>,
    ) -> Result<CouponTerms, CouponRejection>;
}

/// Quotes shipping for a subtotal and destination.
#[async_trait]
pub trait ShippingBackend: Send + Sync {
    /// Request a quote. The raw response is sanitized by the engine.
    async fn quote(&self, subtotal: Money, location: &str)
        -> Result<RawShippingQuote, ShippingError>;
}

/// Client-local persistence for the cart record.
pub trait CartStorage: Send + Sync {
    /// Load the persisted record, if one exists.
    fn load(&self) -> Result<Option<CartRecord>, StorageError>;

    /// Persist the record, replacing any previous one.
    fn save(&self, record: &CartRecord) -> Result<(), StorageError>;

    /// Remove the persisted record.
    fn clear(&self) -> Result<(), StorageError>;
}
