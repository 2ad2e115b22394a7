use bytes::Bytes;
use ethereum_types::{Address, Bloom, H256};
use frontier_rlp::{
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};
use frontier_trie::{Trie, TrieError};
use serde::{Deserialize, Serialize};

use crate::types::{bloom_from_logs, transaction_index_key};

/// Result of a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// State root right after the transaction was applied.
    pub state_root: H256,
    /// Gas used by this transaction and every transaction before it in the block.
    pub cumulative_gas_used: u64,
    pub bloom: Bloom,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn new(state_root: H256, cumulative_gas_used: u64, logs: Vec<Log>) -> Self {
        Self {
            state_root,
            cumulative_gas_used,
            bloom: bloom_from_logs(&logs),
            logs,
        }
    }
}

impl RLPEncode for Receipt {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.state_root)
            .encode_field(&self.cumulative_gas_used)
            .encode_field(&self.bloom)
            .encode_field(&self.logs)
            .finish();
    }
}

impl RLPDecode for Receipt {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (state_root, decoder) = decoder.decode_field("state_root")?;
        let (cumulative_gas_used, decoder) = decoder.decode_field("cumulative_gas_used")?;
        let (bloom, decoder) = decoder.decode_field("bloom")?;
        let (logs, decoder) = decoder.decode_field("logs")?;
        let receipt = Receipt {
            state_root,
            cumulative_gas_used,
            bloom,
            logs,
        };
        Ok((receipt, decoder.finish()?))
    }
}

/// Data record produced during the execution of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    /// Up to four indexed topics.
    pub topics: Vec<H256>,
    pub data: Bytes,
}

impl RLPEncode for Log {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.address)
            .encode_field(&self.topics)
            .encode_field(&self.data)
            .finish();
    }
}

impl RLPDecode for Log {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (address, decoder) = decoder.decode_field("address")?;
        let (topics, decoder) = decoder.decode_field("topics")?;
        let (data, decoder) = decoder.decode_field("data")?;
        let log = Log {
            address,
            topics,
            data,
        };
        Ok((log, decoder.finish()?))
    }
}

/// Receipts root of an ordered list of receipts, keyed by their position.
pub fn compute_receipts_root(receipts: &[Receipt]) -> Result<H256, TrieError> {
    let iter = receipts
        .iter()
        .enumerate()
        .map(|(idx, receipt)| (transaction_index_key(idx), receipt.encode_to_vec()));
    Trie::compute_hash_from_unsorted_iter(iter)
}
