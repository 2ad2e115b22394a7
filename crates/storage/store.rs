pub mod api;
pub mod error;
mod store_db;
mod trie_db;

use std::sync::Arc;

use frontier_common::{
    H256,
    constants::EMPTY_UNCLES_HASH,
    types::{BlockHash, BlockHeader, compute_uncles_hash},
};
use frontier_rlp::{decode::RLPDecode, encode::RLPEncode};
use frontier_trie::Trie;
use tracing::{info, trace};

pub use api::StoreEngine;
pub use error::StoreError;
pub use store_db::in_memory::Store as InMemoryStore;
pub use trie_db::StoreTrieDB;

/// Handle over a key-value engine. Cloning is cheap and every clone sees the same data.
#[derive(Debug, Clone)]
pub struct Store {
    engine: Arc<dyn StoreEngine>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            engine: Arc::new(InMemoryStore::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    InMemory,
}

impl Store {
    pub fn new(engine_type: EngineType) -> Self {
        info!("Starting storage engine ({engine_type:?})");
        match engine_type {
            EngineType::InMemory => Self::default(),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.engine.get(key)
    }

    pub fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.engine.put(key, value)
    }

    /// Stores the header's encoding under its hash.
    pub fn add_block_header(
        &self,
        block_hash: BlockHash,
        block_header: &BlockHeader,
    ) -> Result<(), StoreError> {
        trace!(%block_hash, number = block_header.number, "Storing block header");
        self.put(block_hash.as_bytes(), block_header.encode_to_vec())
    }

    pub fn get_block_header_by_hash(
        &self,
        block_hash: BlockHash,
    ) -> Result<Option<BlockHeader>, StoreError> {
        self.get(block_hash.as_bytes())?
            .map(|encoded| BlockHeader::decode(&encoded))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Stores an uncle list under its uncles hash and returns that hash.
    /// The empty list is never written, as its hash is well known.
    pub fn add_uncles(&self, uncles: &[BlockHeader]) -> Result<H256, StoreError> {
        let uncles_hash = compute_uncles_hash(uncles);
        if uncles_hash != EMPTY_UNCLES_HASH {
            self.put(uncles_hash.as_bytes(), uncles.to_vec().encode_to_vec())?;
        }
        Ok(uncles_hash)
    }

    /// Returns the uncle list committed to by `uncles_hash`. The empty list hash always resolves.
    pub fn get_uncles(&self, uncles_hash: H256) -> Result<Option<Vec<BlockHeader>>, StoreError> {
        if uncles_hash == EMPTY_UNCLES_HASH {
            return Ok(Some(Vec::new()));
        }
        self.get(uncles_hash.as_bytes())?
            .map(|encoded| Vec::<BlockHeader>::decode(&encoded))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Opens the trie rooted at `root`, reading and writing its nodes through this store.
    pub fn open_trie(&self, root: H256) -> Trie {
        Trie::open(Box::new(StoreTrieDB::new(self.engine.clone())), root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use frontier_common::constants::EMPTY_TRIE_HASH;
    use hex_literal::hex;

    fn header(number: u64) -> BlockHeader {
        BlockHeader {
            number,
            timestamp: 1_000 + number,
            extra_data: Bytes::from_static(b"uncle"),
            ..Default::default()
        }
    }

    #[test]
    fn header_is_stored_by_hash() {
        let store = Store::new(EngineType::InMemory);
        let header = header(3);
        let hash = header.hash();
        assert_eq!(store.get_block_header_by_hash(hash).unwrap(), None);

        store.add_block_header(hash, &header).unwrap();
        assert_eq!(store.get_block_header_by_hash(hash).unwrap(), Some(header));
    }

    #[test]
    fn clones_share_the_engine() {
        let store = Store::default();
        let other = store.clone();
        store.put(b"key", b"value".to_vec()).unwrap();
        assert_eq!(other.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn garbage_under_a_header_key_fails_to_decode() {
        let store = Store::default();
        let hash = H256::repeat_byte(0x42);
        store.put(hash.as_bytes(), vec![0x01, 0x02]).unwrap();
        assert!(matches!(
            store.get_block_header_by_hash(hash),
            Err(StoreError::RLPDecode(_))
        ));
    }

    #[test]
    fn uncles_round_trip_through_their_hash() {
        let store = Store::default();
        let uncles = vec![header(1), header(2)];
        let uncles_hash = store.add_uncles(&uncles).unwrap();
        assert_eq!(uncles_hash, compute_uncles_hash(&uncles));
        assert_eq!(store.get_uncles(uncles_hash).unwrap(), Some(uncles));
        assert_eq!(store.get_uncles(H256::repeat_byte(0x01)).unwrap(), None);
    }

    #[test]
    fn empty_uncle_list_always_resolves() {
        let store = Store::default();
        assert_eq!(store.add_uncles(&[]).unwrap(), EMPTY_UNCLES_HASH);
        assert_eq!(store.get(EMPTY_UNCLES_HASH.as_bytes()).unwrap(), None);
        assert_eq!(
            store.get_uncles(EMPTY_UNCLES_HASH).unwrap(),
            Some(Vec::new())
        );
    }

    #[test]
    fn tries_persist_through_the_store() {
        let store = Store::default();
        let mut trie = store.open_trie(EMPTY_TRIE_HASH);
        trie.insert(b"do", b"verb".to_vec()).unwrap();
        trie.insert(b"horse", b"stallion".to_vec()).unwrap();
        trie.insert(b"doge", b"coin".to_vec()).unwrap();
        trie.insert(b"dog", b"puppy".to_vec()).unwrap();
        let root = trie.hash();
        assert_eq!(
            root,
            H256(hex!(
                "5991bb8c6514148a29db676a14ac506cd2cd5775ace63c30a4fe457715e9ac84"
            ))
        );

        let reopened = store.open_trie(root);
        assert_eq!(reopened.get(b"doge").unwrap(), Some(b"coin".to_vec()));
        assert_eq!(reopened.get(b"cat").unwrap(), None);
        // the root node is readable straight from the store
        assert!(store.get(root.as_bytes()).unwrap().is_some());
    }
}
