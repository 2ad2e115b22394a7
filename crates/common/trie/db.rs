use ethereum_types::H256;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use crate::error::TrieError;

/// Backing storage for trie nodes, keyed by the hash of their encoding.
pub trait TrieDB: Send + Sync {
    fn get(&self, key: H256) -> Result<Option<Vec<u8>>, TrieError>;
    fn put(&self, key: H256, value: Vec<u8>) -> Result<(), TrieError>;
}

/// InMemory implementation for the TrieDB trait, with get and put operations.
#[derive(Default, Clone)]
pub struct InMemoryTrieDB {
    inner: Arc<Mutex<BTreeMap<H256, Vec<u8>>>>,
}

impl InMemoryTrieDB {
    /// Number of stored nodes.
    pub fn len(&self) -> Result<usize, TrieError> {
        Ok(self.inner.lock().map_err(|_| TrieError::LockError)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TrieError> {
        Ok(self.len()? == 0)
    }
}

impl TrieDB for InMemoryTrieDB {
    fn get(&self, key: H256) -> Result<Option<Vec<u8>>, TrieError> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| TrieError::LockError)?
            .get(&key)
            .cloned())
    }

    fn put(&self, key: H256, value: Vec<u8>) -> Result<(), TrieError> {
        self.inner
            .lock()
            .map_err(|_| TrieError::LockError)?
            .insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trie;

    #[test]
    fn short_root_is_still_written() {
        let db = InMemoryTrieDB::default();
        assert!(db.is_empty().unwrap());

        let mut trie = Trie::new(Box::new(db.clone()));
        trie.insert(&[0x80], vec![0x01]).unwrap();
        // a lone leaf encodes to a few bytes but the root is always stored by hash
        assert_eq!(db.len().unwrap(), 1);
        let root = db.get(trie.hash()).unwrap();
        assert!(root.is_some_and(|node| node.len() < 32));
    }

    #[test]
    fn clones_share_nodes() {
        let db = InMemoryTrieDB::default();
        db.clone().put(H256::repeat_byte(0x01), vec![0xc0]).unwrap();
        assert_eq!(db.get(H256::repeat_byte(0x01)).unwrap(), Some(vec![0xc0]));
        assert!(!db.is_empty().unwrap());
    }
}
