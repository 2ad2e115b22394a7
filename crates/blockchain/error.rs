use frontier_common::{H256, types::HeaderFieldError};
use frontier_rlp::error::RLPDecodeError;
use frontier_storage::error::StoreError;
use frontier_trie::TrieError;
use frontier_vm::EvmError;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid Block: {0}")]
    InvalidBlock(#[from] InvalidBlockError),
    #[error("A store is required to build a block")]
    MissingStore,
    #[error("Parent block {0:#x} not found")]
    ParentNotFound(H256),
    #[error("Uncle list {0:#x} not found")]
    UnclesNotFound(H256),
    #[error("Receipt at index {0} not found")]
    ReceiptNotFound(usize),
    #[error(transparent)]
    HeaderField(#[from] HeaderFieldError),
    #[error("DB error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Trie error: {0}")]
    TrieError(#[from] TrieError),
    #[error("Failed to decode: {0}")]
    RLPDecodeError(#[from] RLPDecodeError),
    #[error("EVM error: {0}")]
    EvmError(#[from] EvmError),
    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InvalidBlockError {
    #[error("Block timestamp {timestamp} is not greater than its parent's ({parent_timestamp})")]
    TimestampNotAfterParent {
        timestamp: u64,
        parent_timestamp: u64,
    },
    #[error("Extra data is {size} bytes long, at most {max} are allowed")]
    ExtraDataTooLong { size: usize, max: usize },
    #[error("Gas used {gas_used} exceeds the block gas limit {gas_limit}")]
    GasUsedExceedsGasLimit { gas_used: u64, gas_limit: u64 },
    #[error("Block has {count} uncles, at most {max} are allowed")]
    TooManyUncles { count: usize, max: usize },
    #[error("Uncles hash mismatch: header has {header:#x}, computed {computed:#x}")]
    UnclesHashMismatch { header: H256, computed: H256 },
    #[error("Transaction root mismatch: header has {header:#x}, computed {computed:#x}")]
    TransactionRootMismatch { header: H256, computed: H256 },
}
