//! Order assembly for checkout.

mod order;

pub use order::{CustomerInfo, Order, OrderLineItem, OrderStatus, PaymentStatus};
