//! Plan persistence
//!
//! Backends expose plan storage through the [`Plans`] trait. The default
//! trait methods report the capability as missing, so a backend opts into
//! plan storage by overriding them; callers translate that not-found into
//! a user-facing "not implemented" error.

use crate::cluster::OperationKey;
use crate::plan::OperationPlan;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage-layer errors
#[derive(Clone, Debug, PartialEq)]
pub enum StorageError {
    /// The requested record, or the capability to store it, is missing
    NotFound(String),
    /// A record with the same key already exists
    AlreadyExists(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "not found: {}", msg),
            StorageError::AlreadyExists(msg) => write!(f, "already exists: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Operation-plan storage capability of a backend
pub trait Plans {
    /// Persists a new operation plan under the given key
    fn create_operation_plan(
        &self,
        _key: &OperationKey,
        _plan: OperationPlan,
    ) -> Result<(), StorageError> {
        Err(StorageError::NotFound(
            "backend does not support operation plans".to_string(),
        ))
    }

    /// Fetches the operation plan stored under the given key
    fn get_operation_plan(&self, key: &OperationKey) -> Result<OperationPlan, StorageError> {
        Err(StorageError::NotFound(format!(
            "no operation plan for {}",
            key
        )))
    }
}

/// In-memory plan storage
#[derive(Debug, Default)]
pub struct MemBackend {
    plans: Mutex<HashMap<OperationKey, OperationPlan>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OperationKey, OperationPlan>> {
        self.plans.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Plans for MemBackend {
    fn create_operation_plan(
        &self,
        key: &OperationKey,
        plan: OperationPlan,
    ) -> Result<(), StorageError> {
        match self.lock().entry(key.clone()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(format!(
                "operation plan for {}",
                key
            ))),
            Entry::Vacant(entry) => {
                entry.insert(plan);
                Ok(())
            }
        }
    }

    fn get_operation_plan(&self, key: &OperationKey) -> Result<OperationPlan, StorageError> {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("no operation plan for {}", key)))
    }
}
