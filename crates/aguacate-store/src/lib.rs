//! Client-local cart persistence for Tus Aguacates.
//!
//! Backs the commerce engine's `CartStorage` port with a key-value
//! store: Spin's Key-Value Store on wasm32, an in-memory map natively.
//! The cart lives in one namespaced record and survives across visits.
//!
//! # Example
//!
//! ```rust,ignore
//! use aguacate_store::{CartStore, SessionId};
//!
//! let session = SessionId::generate();
//! let storage = CartStore::for_session(&session)?;
//! // hand `storage` to CartSession::open(...)
//! ```

mod cart_store;
mod error;
mod kv;
mod session_id;

pub use cart_store::{CartStore, CART_NAMESPACE};
pub use error::StoreError;
pub use kv::KvStore;
pub use session_id::SessionId;
