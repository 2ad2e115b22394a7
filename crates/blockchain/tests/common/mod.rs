#![allow(dead_code)]

use std::collections::VecDeque;

use bytes::Bytes;
use frontier_common::{
    Address, H256, U256,
    types::{BlockHeader, Transaction, TxKind},
};
use frontier_storage::Store;
use frontier_vm::{Computation, EvmError, ExecutionEngine, LogEntry, TxExecutionError};

pub const GAS_LIMIT: u64 = 3_141_592;
pub const GENESIS_TIMESTAMP: u64 = 1_438_269_973;

/// Engine replaying a fixed list of outcomes, one per applied transaction.
pub struct ScriptedEngine {
    script: VecDeque<Result<Computation, EvmError>>,
    pub applied: Vec<H256>,
}

impl ScriptedEngine {
    pub fn new(script: impl IntoIterator<Item = Result<Computation, EvmError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            applied: Vec::new(),
        }
    }

    pub fn succeeding(computations: impl IntoIterator<Item = Computation>) -> Self {
        Self::new(computations.into_iter().map(Ok))
    }
}

impl ExecutionEngine for ScriptedEngine {
    fn apply_transaction(&mut self, tx: &Transaction) -> Result<Computation, EvmError> {
        self.applied.push(tx.hash());
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(EvmError::Custom("script exhausted".to_string())))
    }
}

pub fn success(gas_remaining: u64, gas_refunded: u64, state: u8) -> Computation {
    Computation {
        gas_remaining,
        gas_refunded,
        state_root: H256::repeat_byte(state),
        ..Default::default()
    }
}

pub fn failure(error: TxExecutionError, gas_remaining: u64, state: u8) -> Computation {
    Computation {
        error: Some(error),
        gas_remaining,
        state_root: H256::repeat_byte(state),
        ..Default::default()
    }
}

pub fn log_entry(address: u8, topics: &[u8]) -> LogEntry {
    LogEntry {
        address: Address::repeat_byte(address),
        topics: topics.iter().map(|t| H256::repeat_byte(*t)).collect(),
        data: Bytes::from_static(b"log"),
    }
}

pub fn transfer(nonce: u64, gas: u64) -> Transaction {
    Transaction {
        nonce,
        gas_price: U256::from(50_000_000_000u64),
        gas,
        to: TxKind::Call(Address::repeat_byte(0xaa)),
        value: U256::from(1_000),
        v: U256::from(27),
        r: U256::from(nonce + 1),
        s: U256::from(nonce + 2),
        ..Default::default()
    }
}

pub fn genesis_header() -> BlockHeader {
    BlockHeader {
        gas_limit: GAS_LIMIT,
        timestamp: GENESIS_TIMESTAMP,
        difficulty: U256::from(17_179_869_184u64),
        ..Default::default()
    }
}

pub fn child_header(parent: &BlockHeader, timestamp: u64) -> BlockHeader {
    BlockHeader {
        parent_hash: parent.hash(),
        number: parent.number + 1,
        gas_limit: GAS_LIMIT,
        timestamp,
        difficulty: parent.difficulty,
        ..Default::default()
    }
}

/// A store holding the genesis header, along with that header.
pub fn store_with_genesis() -> (Store, BlockHeader) {
    let store = Store::default();
    let genesis = genesis_header();
    store
        .add_block_header(genesis.hash(), &genesis)
        .expect("store genesis");
    (store, genesis)
}
