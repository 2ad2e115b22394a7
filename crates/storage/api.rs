use std::fmt::Debug;

use crate::error::StoreError;

/// Raw key-value backend shared by headers, uncle lists and trie nodes.
///
/// Every key written by this crate is a keccak hash of the value (or of the
/// value's source), so a single keyspace is enough.
pub trait StoreEngine: Debug + Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;
}
