//! Catalog snapshot types consumed by the cart.

mod product;

pub use product::{ProductSnapshot, VariantSnapshot};
