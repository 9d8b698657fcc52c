//! Cart and pricing engine for the Tus Aguacates storefront.
//!
//! This crate owns the client-side cart: line items with prices frozen
//! at add time, at most one applied coupon, an always-present shipping
//! quote, and the totals breakdown every checkout surface renders.
//! Remote collaborators (coupon validation, shipping quotes, local
//! storage) are injected through the ports in [`backend`].
//!
//! # Example
//!
//! ```rust,ignore
//! use aguacate_commerce::prelude::*;
//! use std::sync::Arc;
//!
//! let mut cart = CartSession::open(
//!     ShippingConfig::default(),
//!     Arc::new(coupon_backend),
//!     Arc::new(shipping_backend),
//!     Arc::new(storage),
//! );
//!
//! cart.add_item(&product, None, 2)?;
//! cart.apply_coupon("BIENVENIDA10", Some("ana@example.com")).await;
//! cart.calculate_shipping(None).await;
//!
//! let totals = cart.totals();
//! println!("Total: {}", totals.total);
//! ```

pub mod backend;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{ProductSnapshot, VariantSnapshot};

    // Cart
    pub use crate::cart::{
        AppliedCoupon, CartRecord, CartSession, CartTotals, CouponCode, CouponTerms, DiscountKind,
        LineItem, LineItemKind, LineKey, RawShippingQuote, ShippingConfig, ShippingQuote,
    };

    // Checkout
    pub use crate::checkout::{CustomerInfo, Order, OrderLineItem, OrderStatus, PaymentStatus};

    // Ports
    pub use crate::backend::{
        CartStorage, CouponBackend, CouponRejection, ShippingBackend, ShippingError, StorageError,
    };
}
