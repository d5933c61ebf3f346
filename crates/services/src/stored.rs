use serde::de::DeserializeOwned;
use storage::records::load_json;
use storage::{KeyValueStore, StorageError, StoreKey};

/// Loads a slot, treating undecodable contents as an empty slot.
///
/// Backend failures still propagate.
pub(crate) async fn load_or_absent<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StorageError> {
    match load_json(store, key).await {
        Ok(value) => Ok(value),
        Err(StorageError::Serialization(reason)) => {
            tracing::warn!(%key, %reason, "discarding malformed stored value");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
