use ethereum_types::H256;
use hex_literal::hex;

pub use frontier_trie::EMPTY_TRIE_HASH;

/// keccak256(rlp([])): the uncles hash of a block without uncles.
pub const EMPTY_UNCLES_HASH: H256 = H256(hex!(
    "1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347"
));

/// Parent hash carried by the genesis block.
pub const GENESIS_PARENT_HASH: H256 = H256::zero();

/// Maximum size in bytes of a header's extra data.
pub const MAX_EXTRA_DATA_SIZE: usize = 32;

/// Maximum number of uncle headers a block may include.
pub const MAX_UNCLES: usize = 2;
