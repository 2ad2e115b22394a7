use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{api::StoreEngine, error::StoreError};

#[derive(Default, Clone)]
pub struct Store(Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>);

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> Result<MutexGuard<'_, HashMap<Vec<u8>, Vec<u8>>>, StoreError> {
        self.0.lock().map_err(|_| StoreError::LockError)
    }
}

impl StoreEngine for Store {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner()?.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.inner()?.insert(key.to_vec(), value);
        Ok(())
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("In Memory Store").finish()
    }
}
