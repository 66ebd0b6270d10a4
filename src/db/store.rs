use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Keys of the records this application persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    OnboardingSeen,
    RecentViews,
    DailyRecommendation,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::OnboardingSeen => write!(f, "onboarding-seen"),
            StoreKey::RecentViews => write!(f, "recent-views"),
            StoreKey::DailyRecommendation => write!(f, "daily-recommendation"),
        }
    }
}

/// Durable string-valued key-value storage
///
/// Values are JSON documents. Implementations only need to be consistent for a
/// single writer; the engine never writes concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw stored value, or `None` if the key was never written
    fn get(&self, key: &StoreKey) -> AppResult<Option<String>>;

    /// Replaces the stored value
    fn set(&self, key: &StoreKey, value: String) -> AppResult<()>;
}

/// Reads and decodes a persisted record, failing soft
///
/// A missing key, a storage failure or a value that doesn't decode as `T` all
/// yield `None`; malformed values are discarded and logged.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &StoreKey) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read persisted record");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Discarding malformed persisted record");
            None
        }
    }
}

/// Encodes and writes a record without surfacing failures
///
/// Returns whether the write was accepted by the store. Callers keep their
/// in-memory copy either way.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &StoreKey,
    value: &T,
) -> bool {
    let json = match serde_json::to_string(value) {
        Ok(j) => j,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Record serialization error");
            return false;
        }
    };

    match store.set(key, json) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Failed to persist record");
            false
        }
    }
}

/// Process-local store, used for tests and for running without a data dir
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        values.insert(*key, value);
        Ok(())
    }
}
