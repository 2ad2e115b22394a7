mod common;

use common::{
    GENESIS_TIMESTAMP, ScriptedEngine, child_header, log_entry, store_with_genesis, success,
    transfer,
};
use frontier_blockchain::{
    Blockchain, BlockchainOptions,
    block::{Block, BlockBuilder},
    error::{ChainError, InvalidBlockError},
};
use frontier_common::{
    H256,
    types::{BlockHeader, compute_uncles_hash},
};
use frontier_storage::Store;
use frontier_vm::Computation;

fn assembled_block(blockchain: &Blockchain, parent: &BlockHeader, count: u64) -> Block {
    let mut block = blockchain.new_block(child_header(parent, parent.timestamp + 15));
    let mut engine = ScriptedEngine::succeeding((0..count).map(|i| Computation {
        logs: vec![log_entry(i as u8, &[0x01])],
        ..success(50_000, 1_000, i as u8)
    }));
    for nonce in 0..count {
        block
            .apply_transaction(&mut engine, transfer(nonce, 100_000))
            .unwrap();
    }
    block
}

#[test]
fn block_round_trips_through_its_header() {
    let (store, genesis) = store_with_genesis();
    let blockchain = Blockchain::default_with_store(store.clone());
    let block = assembled_block(&blockchain, &genesis, 3);

    let rebuilt = Block::from_header(block.header().clone(), store).unwrap();
    assert_eq!(rebuilt.header(), block.header());
    assert_eq!(rebuilt.transactions(), block.transactions());
    assert_eq!(rebuilt.uncles(), block.uncles());
    assert_eq!(rebuilt.receipts().unwrap(), block.receipts().unwrap());
    assert_eq!(
        rebuilt.cumulative_gas_used().unwrap(),
        block.cumulative_gas_used().unwrap()
    );
    assert_eq!(rebuilt.bloom(), block.bloom());
}

#[test]
fn uncles_are_loaded_by_hash() {
    let (store, genesis) = store_with_genesis();
    let uncles = vec![BlockHeader {
        number: 1,
        timestamp: GENESIS_TIMESTAMP + 3,
        ..Default::default()
    }];
    let mut header = child_header(&genesis, GENESIS_TIMESTAMP + 15);
    header.uncles_hash = compute_uncles_hash(&uncles);

    assert!(matches!(
        Block::from_header(header.clone(), store.clone()),
        Err(ChainError::UnclesNotFound(hash)) if hash == header.uncles_hash
    ));

    store.add_uncles(&uncles).unwrap();
    let block = Block::from_header(header, store).unwrap();
    assert_eq!(block.uncles(), uncles.as_slice());
    block.validate().unwrap();
}

#[test]
fn builder_requires_a_store() {
    let header = BlockHeader::default();
    assert!(matches!(
        BlockBuilder::new(header.clone()).build(),
        Err(ChainError::MissingStore)
    ));

    let block = Block::builder(header)
        .transactions(Vec::new())
        .uncles(Vec::new())
        .store(Store::default())
        .build()
        .unwrap();
    assert!(block.transactions().is_empty());
    assert!(block.uncles().is_empty());
}

#[test]
fn construction_opens_existing_indexes() {
    let (store, genesis) = store_with_genesis();
    let blockchain = Blockchain::default_with_store(store.clone());
    let block = assembled_block(&blockchain, &genesis, 2);

    // bound to the same roots, the receipts written earlier are visible
    let view = Block::new(block.header().clone(), Vec::new(), Vec::new(), store);
    assert_eq!(view.receipts().unwrap().len(), 2);
    assert_eq!(view.bloom(), block.header().bloom);
}

#[test]
fn add_block_stores_a_retrievable_block() {
    let (store, genesis) = store_with_genesis();
    let blockchain = Blockchain::new(
        store,
        BlockchainOptions {
            perf_logs_enabled: true,
            ..Default::default()
        },
    );
    let block = assembled_block(&blockchain, &genesis, 2);
    let hash = block.hash();
    assert!(blockchain.get_block_by_hash(hash).unwrap().is_none());

    blockchain.add_block(&block).unwrap();
    let stored = blockchain.get_block_by_hash(hash).unwrap().unwrap();
    assert_eq!(stored.header(), block.header());
    assert_eq!(stored.transactions(), block.transactions());

    // the stored block is a valid parent for the next one
    let child = assembled_block(&blockchain, block.header(), 1);
    assert_eq!(child.parent().unwrap().hash(), hash);
    blockchain.add_block(&child).unwrap();
}

#[test]
fn add_block_rejects_invalid_blocks() {
    let (store, genesis) = store_with_genesis();
    let blockchain = Blockchain::default_with_store(store);
    let block = blockchain.new_block(child_header(&genesis, GENESIS_TIMESTAMP));
    assert!(matches!(
        blockchain.add_block(&block),
        Err(ChainError::InvalidBlock(InvalidBlockError::TimestampNotAfterParent { .. }))
    ));
    let stored = blockchain.get_block_by_hash(block.hash()).unwrap();
    assert!(stored.is_none());
}

#[test]
fn unknown_hash_has_no_block() {
    let blockchain = Blockchain::default_with_store(Store::default());
    assert!(
        blockchain
            .get_block_by_hash(H256::repeat_byte(0x11))
            .unwrap()
            .is_none()
    );
}
