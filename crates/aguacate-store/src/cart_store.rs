//! The persisted cart record store.
//!
//! One namespaced key holds the visitor's whole cart. Loads run the
//! record migration, so a shape change never strands a returning
//! visitor; an unreadable record simply reads as "no cart".

use crate::{KvStore, SessionId, StoreError};
use aguacate_commerce::backend::{CartStorage, StorageError};
use aguacate_commerce::cart::{migrate, CartRecord};

/// Namespace the storefront has always persisted the cart under.
pub const CART_NAMESPACE: &str = "tus-aguacates-cart";

/// Client-local storage for the cart record.
pub struct CartStore {
    kv: KvStore,
    key: String,
}

impl CartStore {
    /// Open the shared single-visitor store (the browser-local case).
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self {
            kv: KvStore::open_default()?,
            key: CART_NAMESPACE.to_string(),
        })
    }

    /// Open a per-visitor store keyed by session.
    pub fn for_session(session: &SessionId) -> Result<Self, StoreError> {
        Ok(Self {
            kv: KvStore::open_default()?,
            key: format!("{}:{}", CART_NAMESPACE, session),
        })
    }

    /// The storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartStorage for CartStore {
    fn load(&self) -> Result<Option<CartRecord>, StorageError> {
        let raw: Option<serde_json::Value> = self
            .kv
            .get(&self.key)
            .map_err(|e| StorageError(e.to_string()))?;
        Ok(raw.and_then(migrate))
    }

    fn save(&self, record: &CartRecord) -> Result<(), StorageError> {
        self.kv
            .set(&self.key, record)
            .map_err(|e| StorageError(e.to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.kv
            .delete(&self.key)
            .map_err(|e| StorageError(e.to_string()))
    }
}
