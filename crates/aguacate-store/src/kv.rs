//! Key-Value store wrapper with automatic serialization.
//!
//! On wasm32 this wraps Spin's Key-Value Store; natively it is an
//! in-memory map with the same API, so persistence-dependent code runs
//! under plain `cargo test`.

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe store with JSON serialization for any `Serialize +
/// DeserializeOwned` type.
pub struct KvStore {
    #[cfg(target_arch = "wasm32")]
    store: spin_sdk::key_value::Store,
    #[cfg(not(target_arch = "wasm32"))]
    store: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(target_arch = "wasm32")]
impl KvStore {
    /// Open the default Key-Value store.
    pub fn open_default() -> Result<Self, StoreError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| StoreError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }

    /// Get a value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key) {
            Ok(Some(bytes)) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::OperationError(e.to_string())),
        }
    }

    /// Set a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.store
            .set(key, &bytes)
            .map_err(|e| StoreError::OperationError(e.to_string()))
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.store
            .delete(key)
            .map_err(|e| StoreError::OperationError(e.to_string()))
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.store
            .exists(key)
            .map_err(|e| StoreError::OperationError(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KvStore {
    /// Open an in-memory store.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self {
            store: std::sync::Mutex::new(std::collections::HashMap::new()),
        })
    }

    /// Get a value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let map = self
            .store
            .lock()
            .map_err(|e| StoreError::OperationError(e.to_string()))?;
        match map.get(key) {
            Some(bytes) => {
                let value: T = serde_json::from_slice(bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        let mut map = self
            .store
            .lock()
            .map_err(|e| StoreError::OperationError(e.to_string()))?;
        map.insert(key.to_string(), bytes);
        Ok(())
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self
            .store
            .lock()
            .map_err(|e| StoreError::OperationError(e.to_string()))?;
        map.remove(key);
        Ok(())
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let map = self
            .store
            .lock()
            .map_err(|e| StoreError::OperationError(e.to_string()))?;
        Ok(map.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let kv = KvStore::open_default().unwrap();
        kv.set("greeting", &"hola".to_string()).unwrap();
        let value: Option<String> = kv.get("greeting").unwrap();
        assert_eq!(value.as_deref(), Some("hola"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let kv = KvStore::open_default().unwrap();
        let value: Option<String> = kv.get("nope").unwrap();
        assert!(value.is_none());
        assert!(!kv.exists("nope").unwrap());
    }

    #[test]
    fn test_delete() {
        let kv = KvStore::open_default().unwrap();
        kv.set("k", &1_i64).unwrap();
        assert!(kv.exists("k").unwrap());
        kv.delete("k").unwrap();
        assert!(!kv.exists("k").unwrap());
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let kv = KvStore::open_default().unwrap();
        kv.set("k", &"texto".to_string()).unwrap();
        let result: Result<Option<i64>, _> = kv.get("k");
        assert!(result.is_err());
    }
}
