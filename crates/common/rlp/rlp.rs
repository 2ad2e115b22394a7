//! Recursive Length Prefix (RLP) encoding.
//!
//! The canonical byte serialization used for every record the block core
//! hashes or stores: headers, transactions, receipts, logs and trie nodes.

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod structs;
