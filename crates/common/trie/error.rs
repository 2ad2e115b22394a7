use ethereum_types::H256;
use frontier_rlp::error::RLPDecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrieError {
    #[error(transparent)]
    RLPDecode(#[from] RLPDecodeError),
    #[error("Verification Error: Node {0:#x} is referenced but missing from the database")]
    InconsistentTree(H256),
    #[error("Invalid node encoding: {0}")]
    InvalidNode(String),
    #[error("Empty values cannot be inserted")]
    EmptyValue,
    #[error("Lock Error: Panicked when trying to acquire a lock")]
    LockError,
    #[error("DB Error: {0}")]
    DbError(String),
}
