//! Typed JSON access to the key-value slots.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{KeyValueStore, StorageError, StoreKey};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Load and decode the JSON document under `key`.
///
/// Returns `Ok(None)` for an empty slot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` when the stored text is not a valid
/// `T`, or any backend error from the store.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(ser)
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or any backend error.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(ser)?;
    store.set(key, raw).await
}
