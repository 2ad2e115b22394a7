use std::collections::BTreeMap;

use bytes::Bytes;
use ethereum_types::{Address, Bloom, H64, H256, U256};
use frontier_rlp::{
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};
use frontier_trie::PathRLP;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::{EMPTY_TRIE_HASH, EMPTY_UNCLES_HASH, GENESIS_PARENT_HASH},
    utils::keccak,
};

pub type BlockNumber = u64;
pub type BlockHash = H256;

/// Header part of a block on the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub parent_hash: BlockHash,
    pub uncles_hash: H256,
    pub coinbase: Address,
    pub state_root: H256,
    pub transaction_root: H256,
    pub receipt_root: H256,
    pub bloom: Bloom,
    pub difficulty: U256,
    pub number: BlockNumber,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: H256,
    pub nonce: u64,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            parent_hash: GENESIS_PARENT_HASH,
            uncles_hash: EMPTY_UNCLES_HASH,
            coinbase: Address::zero(),
            state_root: EMPTY_TRIE_HASH,
            transaction_root: EMPTY_TRIE_HASH,
            receipt_root: EMPTY_TRIE_HASH,
            bloom: Bloom::zero(),
            difficulty: U256::zero(),
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: H256::zero(),
            nonce: 0,
        }
    }
}

impl BlockHeader {
    /// keccak256 of the header's RLP encoding. Not cached, as the header stays
    /// mutable while its block is assembled.
    pub fn hash(&self) -> BlockHash {
        keccak(self.encode_to_vec())
    }

    /// The genesis block has no parent to validate against.
    pub fn is_genesis(&self) -> bool {
        self.number == 0 || self.parent_hash == GENESIS_PARENT_HASH
    }

    pub fn apply(&mut self, update: HeaderUpdate) {
        match update {
            HeaderUpdate::UnclesHash(hash) => self.uncles_hash = hash,
            HeaderUpdate::StateRoot(root) => self.state_root = root,
            HeaderUpdate::TransactionRoot(root) => self.transaction_root = root,
            HeaderUpdate::ReceiptRoot(root) => self.receipt_root = root,
            HeaderUpdate::Bloom(bloom) => self.bloom = bloom,
            HeaderUpdate::GasUsed(gas_used) => self.gas_used = gas_used,
            HeaderUpdate::ExtraData(extra_data) => self.extra_data = extra_data,
            HeaderUpdate::MixHash(mix_hash) => self.mix_hash = mix_hash,
            HeaderUpdate::Nonce(nonce) => self.nonce = nonce,
        }
    }
}

impl RLPEncode for BlockHeader {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.parent_hash)
            .encode_field(&self.uncles_hash)
            .encode_field(&self.coinbase)
            .encode_field(&self.state_root)
            .encode_field(&self.transaction_root)
            .encode_field(&self.receipt_root)
            .encode_field(&self.bloom)
            .encode_field(&self.difficulty)
            .encode_field(&self.number)
            .encode_field(&self.gas_limit)
            .encode_field(&self.gas_used)
            .encode_field(&self.timestamp)
            .encode_field(&self.extra_data)
            .encode_field(&self.mix_hash)
            .encode_field(&H64::from_low_u64_be(self.nonce))
            .finish();
    }
}

impl RLPDecode for BlockHeader {
    fn decode_unfinished(rlp: &[u8]) -> Result<(BlockHeader, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (parent_hash, decoder) = decoder.decode_field("parent_hash")?;
        let (uncles_hash, decoder) = decoder.decode_field("uncles_hash")?;
        let (coinbase, decoder) = decoder.decode_field("coinbase")?;
        let (state_root, decoder) = decoder.decode_field("state_root")?;
        let (transaction_root, decoder) = decoder.decode_field("transaction_root")?;
        let (receipt_root, decoder) = decoder.decode_field("receipt_root")?;
        let (bloom, decoder) = decoder.decode_field("bloom")?;
        let (difficulty, decoder) = decoder.decode_field("difficulty")?;
        let (number, decoder) = decoder.decode_field("number")?;
        let (gas_limit, decoder) = decoder.decode_field("gas_limit")?;
        let (gas_used, decoder) = decoder.decode_field("gas_used")?;
        let (timestamp, decoder) = decoder.decode_field("timestamp")?;
        let (extra_data, decoder) = decoder.decode_field("extra_data")?;
        let (mix_hash, decoder) = decoder.decode_field("mix_hash")?;
        let (nonce, decoder): (H64, _) = decoder.decode_field("nonce")?;

        let header = BlockHeader {
            parent_hash,
            uncles_hash,
            coinbase,
            state_root,
            transaction_root,
            receipt_root,
            bloom,
            difficulty,
            number,
            gas_limit,
            gas_used,
            timestamp,
            extra_data,
            mix_hash,
            nonce: nonce.to_low_u64_be(),
        };
        Ok((header, decoder.finish()?))
    }
}

/// Hash committing to an ordered list of uncle headers.
pub fn compute_uncles_hash(uncles: &[BlockHeader]) -> H256 {
    keccak(uncles.to_vec().encode_to_vec())
}

/// Key under which the transaction (and its receipt) at `index` is stored in the block's tries.
pub fn transaction_index_key(index: usize) -> PathRLP {
    index.encode_to_vec()
}

/// A header field that may be set once the block is assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderUpdate {
    UnclesHash(H256),
    StateRoot(H256),
    TransactionRoot(H256),
    ReceiptRoot(H256),
    Bloom(Bloom),
    GasUsed(u64),
    ExtraData(Bytes),
    MixHash(H256),
    Nonce(u64),
}

/// Untyped value for a named header field, see [`HeaderUpdate::from_named_fields`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderValue {
    Hash(H256),
    Bloom(Bloom),
    Integer(u64),
    Bytes(Bytes),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderFieldError {
    #[error("Unable to set the field(s) {} on the block header", .0.join(", "))]
    Unknown(Vec<String>),
    #[error("Header field {field} expects a {expected} value")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

impl HeaderUpdate {
    pub const FIELD_NAMES: [&'static str; 9] = [
        "uncles_hash",
        "state_root",
        "transaction_root",
        "receipt_root",
        "bloom",
        "gas_used",
        "extra_data",
        "mix_hash",
        "nonce",
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            HeaderUpdate::UnclesHash(_) => "uncles_hash",
            HeaderUpdate::StateRoot(_) => "state_root",
            HeaderUpdate::TransactionRoot(_) => "transaction_root",
            HeaderUpdate::ReceiptRoot(_) => "receipt_root",
            HeaderUpdate::Bloom(_) => "bloom",
            HeaderUpdate::GasUsed(_) => "gas_used",
            HeaderUpdate::ExtraData(_) => "extra_data",
            HeaderUpdate::MixHash(_) => "mix_hash",
            HeaderUpdate::Nonce(_) => "nonce",
        }
    }

    /// Builds the update for the field called `name`.
    pub fn from_named(name: &str, value: HeaderValue) -> Result<Self, HeaderFieldError> {
        let mismatch = |field, expected| HeaderFieldError::InvalidValue { field, expected };
        match (name, value) {
            ("uncles_hash", HeaderValue::Hash(hash)) => Ok(HeaderUpdate::UnclesHash(hash)),
            ("state_root", HeaderValue::Hash(root)) => Ok(HeaderUpdate::StateRoot(root)),
            ("transaction_root", HeaderValue::Hash(root)) => {
                Ok(HeaderUpdate::TransactionRoot(root))
            }
            ("receipt_root", HeaderValue::Hash(root)) => Ok(HeaderUpdate::ReceiptRoot(root)),
            ("mix_hash", HeaderValue::Hash(hash)) => Ok(HeaderUpdate::MixHash(hash)),
            ("bloom", HeaderValue::Bloom(bloom)) => Ok(HeaderUpdate::Bloom(bloom)),
            ("gas_used", HeaderValue::Integer(gas)) => Ok(HeaderUpdate::GasUsed(gas)),
            ("nonce", HeaderValue::Integer(nonce)) => Ok(HeaderUpdate::Nonce(nonce)),
            ("extra_data", HeaderValue::Bytes(data)) => Ok(HeaderUpdate::ExtraData(data)),
            ("uncles_hash", _) => Err(mismatch("uncles_hash", "hash")),
            ("state_root", _) => Err(mismatch("state_root", "hash")),
            ("transaction_root", _) => Err(mismatch("transaction_root", "hash")),
            ("receipt_root", _) => Err(mismatch("receipt_root", "hash")),
            ("mix_hash", _) => Err(mismatch("mix_hash", "hash")),
            ("bloom", _) => Err(mismatch("bloom", "bloom")),
            ("gas_used", _) => Err(mismatch("gas_used", "integer")),
            ("nonce", _) => Err(mismatch("nonce", "integer")),
            ("extra_data", _) => Err(mismatch("extra_data", "bytes")),
            (unknown, _) => Err(HeaderFieldError::Unknown(vec![unknown.to_string()])),
        }
    }

    /// Resolves every named field, failing as a whole if any name is unknown or any value
    /// has the wrong type. Unknown names are all reported together.
    pub fn from_named_fields(
        fields: BTreeMap<String, HeaderValue>,
    ) -> Result<Vec<Self>, HeaderFieldError> {
        let unknown: Vec<String> = fields
            .keys()
            .filter(|name| !Self::FIELD_NAMES.contains(&name.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(HeaderFieldError::Unknown(unknown));
        }
        fields
            .into_iter()
            .map(|(name, value)| Self::from_named(&name, value))
            .collect()
    }
}
