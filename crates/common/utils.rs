use ethereum_types::H256;
use sha3::{Digest, Keccak256};

pub fn keccak(data: impl AsRef<[u8]>) -> H256 {
    H256(Keccak256::digest(data.as_ref()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EMPTY_TRIE_HASH, EMPTY_UNCLES_HASH};
    use frontier_rlp::constants::{RLP_EMPTY_LIST, RLP_NULL};

    #[test]
    fn empty_hash_constants_match_their_preimages() {
        assert_eq!(keccak([RLP_NULL]), EMPTY_TRIE_HASH);
        assert_eq!(keccak([RLP_EMPTY_LIST]), EMPTY_UNCLES_HASH);
    }
}
