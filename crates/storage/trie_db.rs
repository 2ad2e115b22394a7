use std::sync::Arc;

use ethereum_types::H256;
use frontier_trie::{TrieDB, TrieError};

use crate::api::StoreEngine;

/// Exposes a [`StoreEngine`] as trie node storage. Nodes are keyed by the raw
/// bytes of their hash.
pub struct StoreTrieDB {
    engine: Arc<dyn StoreEngine>,
}

impl StoreTrieDB {
    pub fn new(engine: Arc<dyn StoreEngine>) -> Self {
        Self { engine }
    }
}

impl TrieDB for StoreTrieDB {
    fn get(&self, key: H256) -> Result<Option<Vec<u8>>, TrieError> {
        self.engine
            .get(key.as_bytes())
            .map_err(|e| TrieError::DbError(e.to_string()))
    }

    fn put(&self, key: H256, value: Vec<u8>) -> Result<(), TrieError> {
        self.engine
            .put(key.as_bytes(), value)
            .map_err(|e| TrieError::DbError(e.to_string()))
    }
}
