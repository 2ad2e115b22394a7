use std::str::FromStr;

use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use frontier_rlp::{
    constants::RLP_NULL,
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};
use frontier_trie::{Trie, TrieError};
use serde::{Deserialize, Serialize};

use crate::{types::transaction_index_key, utils::keccak};

/// A signed frontier transaction. Signatures are carried but never verified here.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    /// The recipient of the transaction.
    /// Create transactions contain a [`null`](RLP_NULL) value in this field.
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

/// The transaction's kind: call or create.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TxKind {
    Call(Address),
    #[default]
    Create,
}

impl Transaction {
    pub fn hash(&self) -> H256 {
        keccak(self.encode_to_vec())
    }

    pub fn is_contract_creation(&self) -> bool {
        matches!(self.to, TxKind::Create)
    }
}

impl RLPEncode for TxKind {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        match self {
            Self::Call(address) => address.encode(buf),
            Self::Create => buf.put_u8(RLP_NULL),
        }
    }
}

impl RLPDecode for TxKind {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let first_byte = rlp.first().ok_or(RLPDecodeError::InvalidLength)?;
        if *first_byte == RLP_NULL {
            return Ok((Self::Create, &rlp[1..]));
        }
        Address::decode_unfinished(rlp).map(|(t, rest)| (Self::Call(t), rest))
    }
}

impl Serialize for TxKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            TxKind::Call(address) => serializer.serialize_str(&format!("{address:#x}")),
            TxKind::Create => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TxKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let str_option = Option::<String>::deserialize(deserializer)?;
        match str_option {
            Some(str) if !str.is_empty() => Ok(TxKind::Call(
                Address::from_str(str.trim_start_matches("0x")).map_err(|_| {
                    serde::de::Error::custom(format!("Failed to deserialize hex value {str}"))
                })?,
            )),
            _ => Ok(TxKind::Create),
        }
    }
}

impl RLPEncode for Transaction {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.nonce)
            .encode_field(&self.gas_price)
            .encode_field(&self.gas)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data)
            .encode_field(&self.v)
            .encode_field(&self.r)
            .encode_field(&self.s)
            .finish();
    }
}

impl RLPDecode for Transaction {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Transaction, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (nonce, decoder) = decoder.decode_field("nonce")?;
        let (gas_price, decoder) = decoder.decode_field("gas_price")?;
        let (gas, decoder) = decoder.decode_field("gas")?;
        let (to, decoder) = decoder.decode_field("to")?;
        let (value, decoder) = decoder.decode_field("value")?;
        let (data, decoder) = decoder.decode_field("data")?;
        let (v, decoder) = decoder.decode_field("v")?;
        let (r, decoder) = decoder.decode_field("r")?;
        let (s, decoder) = decoder.decode_field("s")?;

        let tx = Transaction {
            nonce,
            gas_price,
            gas,
            to,
            value,
            data,
            v,
            r,
            s,
        };
        Ok((tx, decoder.finish()?))
    }
}

/// Root of the trie mapping each transaction's index to its encoding.
pub fn compute_transactions_root(transactions: &[Transaction]) -> Result<H256, TrieError> {
    let iter = transactions
        .iter()
        .enumerate()
        .map(|(idx, tx)| (transaction_index_key(idx), tx.encode_to_vec()));
    Trie::compute_hash_from_unsorted_iter(iter)
}
