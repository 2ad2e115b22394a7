mod common;

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use common::{
    GENESIS_TIMESTAMP, ScriptedEngine, child_header, genesis_header, store_with_genesis, success,
    transfer,
};
use frontier_blockchain::{
    BlockchainOptions,
    block::Block,
    error::{ChainError, InvalidBlockError},
    validation::{ValidationPipeline, Validator},
};
use frontier_common::{
    H256,
    types::{BlockHeader, compute_uncles_hash},
};
use frontier_storage::Store;

fn child_with_timestamp(timestamp: u64) -> Block {
    let (store, genesis) = store_with_genesis();
    Block::new(
        child_header(&genesis, timestamp),
        Vec::new(),
        Vec::new(),
        store,
    )
}

#[test]
fn timestamp_must_be_after_parent() {
    for timestamp in [GENESIS_TIMESTAMP, GENESIS_TIMESTAMP - 1] {
        let err = child_with_timestamp(timestamp).validate().unwrap_err();
        assert!(matches!(
            err,
            ChainError::InvalidBlock(InvalidBlockError::TimestampNotAfterParent {
                parent_timestamp: GENESIS_TIMESTAMP,
                ..
            })
        ));
    }
    child_with_timestamp(GENESIS_TIMESTAMP + 1)
        .validate()
        .unwrap();
}

#[test]
fn genesis_skips_parent_checks() {
    let block = Block::new(genesis_header(), Vec::new(), Vec::new(), Store::default());
    block.validate().unwrap();
}

#[test]
fn missing_parent_is_not_found() {
    let parent = genesis_header();
    let block = Block::new(
        child_header(&parent, GENESIS_TIMESTAMP + 1),
        Vec::new(),
        Vec::new(),
        Store::default(),
    );
    assert!(matches!(
        block.validate(),
        Err(ChainError::ParentNotFound(hash)) if hash == parent.hash()
    ));
    assert!(matches!(block.parent(), Err(ChainError::ParentNotFound(_))));
}

#[test]
fn validation_is_repeatable() {
    let block = child_with_timestamp(GENESIS_TIMESTAMP + 1);
    let before = block.header().clone();
    block.validate().unwrap();
    block.validate().unwrap();
    assert_eq!(block.header(), &before);
}

#[test]
fn extra_data_is_bounded() {
    let (store, genesis) = store_with_genesis();
    let mut header = child_header(&genesis, GENESIS_TIMESTAMP + 1);
    header.extra_data = Bytes::from(vec![0u8; 33]);
    let block = Block::new(header.clone(), Vec::new(), Vec::new(), store.clone());
    assert!(matches!(
        block.validate(),
        Err(ChainError::InvalidBlock(InvalidBlockError::ExtraDataTooLong { size: 33, max: 32 }))
    ));

    let relaxed = BlockchainOptions {
        max_extra_data_size: 64,
        ..Default::default()
    };
    block
        .validate_with(&ValidationPipeline::frontier(&relaxed))
        .unwrap();

    header.extra_data = Bytes::from(vec![0u8; 32]);
    Block::new(header, Vec::new(), Vec::new(), store)
        .validate()
        .unwrap();
}

#[test]
fn gas_used_cannot_exceed_gas_limit() {
    let (store, genesis) = store_with_genesis();
    let mut header = child_header(&genesis, GENESIS_TIMESTAMP + 1);
    header.gas_limit = 50_000;
    let mut block = Block::new(header, Vec::new(), Vec::new(), store);
    let mut engine = ScriptedEngine::succeeding([success(0, 0, 0x01)]);
    block
        .apply_transaction(&mut engine, transfer(0, 60_000))
        .unwrap();
    assert!(matches!(
        block.validate(),
        Err(ChainError::InvalidBlock(InvalidBlockError::GasUsedExceedsGasLimit {
            gas_used: 60_000,
            gas_limit: 50_000
        }))
    ));
}

fn uncle(number: u64) -> BlockHeader {
    BlockHeader {
        number,
        timestamp: GENESIS_TIMESTAMP + number,
        ..Default::default()
    }
}

#[test]
fn uncles_must_match_the_header() {
    let (store, genesis) = store_with_genesis();
    let uncles = vec![uncle(1), uncle(2)];
    let mut header = child_header(&genesis, GENESIS_TIMESTAMP + 1);

    let block = Block::new(header.clone(), Vec::new(), uncles.clone(), store.clone());
    assert!(matches!(
        block.validate(),
        Err(ChainError::InvalidBlock(InvalidBlockError::UnclesHashMismatch { .. }))
    ));

    header.uncles_hash = compute_uncles_hash(&uncles);
    Block::new(header, Vec::new(), uncles, store)
        .validate()
        .unwrap();
}

#[test]
fn uncle_count_is_bounded() {
    let (store, genesis) = store_with_genesis();
    let uncles = vec![uncle(1), uncle(2), uncle(3)];
    let mut header = child_header(&genesis, GENESIS_TIMESTAMP + 1);
    header.uncles_hash = compute_uncles_hash(&uncles);
    let block = Block::new(header, Vec::new(), uncles, store);
    assert!(matches!(
        block.validate(),
        Err(ChainError::InvalidBlock(InvalidBlockError::TooManyUncles { count: 3, max: 2 }))
    ));
}

#[test]
fn transaction_root_must_commit_to_the_transactions() {
    let (store, genesis) = store_with_genesis();
    let block = Block::new(
        child_header(&genesis, GENESIS_TIMESTAMP + 1),
        vec![transfer(0, 21_000)],
        Vec::new(),
        store,
    );
    assert!(matches!(
        block.validate(),
        Err(ChainError::InvalidBlock(InvalidBlockError::TransactionRootMismatch { .. }))
    ));
}

/// Records its name when run and optionally fails.
struct RecordingValidator {
    name: &'static str,
    fail: bool,
    runs: Arc<Mutex<Vec<&'static str>>>,
}

impl Validator for RecordingValidator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, _block: &Block) -> Result<(), ChainError> {
        self.runs.lock().expect("runs lock").push(self.name);
        if self.fail {
            return Err(ChainError::Custom(self.name.to_string()));
        }
        Ok(())
    }
}

#[test]
fn parent_stage_runs_before_structural_stage() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let recording = |name, fail| RecordingValidator {
        name,
        fail,
        runs: runs.clone(),
    };
    let pipeline = ValidationPipeline::new()
        .with_structural_validator(recording("structural", false))
        .with_parent_validator(recording("parent", false));
    let block = child_with_timestamp(GENESIS_TIMESTAMP + 1);
    block.validate_with(&pipeline).unwrap();
    assert_eq!(*runs.lock().unwrap(), vec!["parent", "structural"]);
}

#[test]
fn first_failure_stops_validation() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let recording = |name, fail| RecordingValidator {
        name,
        fail,
        runs: runs.clone(),
    };
    let pipeline = ValidationPipeline::new()
        .with_parent_validator(recording("parent", true))
        .with_structural_validator(recording("structural", false));
    let block = child_with_timestamp(GENESIS_TIMESTAMP + 1);
    assert!(matches!(
        block.validate_with(&pipeline),
        Err(ChainError::Custom(name)) if name == "parent"
    ));
    assert_eq!(*runs.lock().unwrap(), vec!["parent"]);
}

#[test]
fn parent_resolution_reads_the_stored_header() {
    let (store, genesis) = store_with_genesis();
    let block = Block::new(
        child_header(&genesis, GENESIS_TIMESTAMP + 1),
        Vec::new(),
        Vec::new(),
        store,
    );
    assert_eq!(block.parent_header().unwrap(), genesis);
    let parent = block.parent().unwrap();
    assert_eq!(parent.header(), &genesis);
    assert_eq!(parent.hash(), block.header().parent_hash);
    assert_ne!(parent.hash(), H256::zero());
}
