use frontier_rlp::error::RLPDecodeError;
use frontier_trie::TrieError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Rlp decode error: {0}")]
    RLPDecode(#[from] RLPDecodeError),
    #[error(transparent)]
    Trie(#[from] TrieError),
    #[error("Failed to lock the store")]
    LockError,
    #[error("{0}")]
    Custom(String),
}
