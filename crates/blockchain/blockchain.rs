//! # frontier Blockchain
//!
//! Block assembly and validation for a Frontier execution layer.
//!
//! ## Overview
//!
//! This crate is responsible for:
//! - Applying transactions to a block through an [`ExecutionEngine`](frontier_vm::ExecutionEngine)
//! - Maintaining the block's transaction and receipt indexes, bloom and gas accounting
//! - Validating blocks against their parent and against the frontier structural rules
//! - Storing validated blocks and reconstructing them from their headers
//!
//! ## Block Assembly Flow
//!
//! ```text
//! 1. Build a Block over a header and a store
//! 2. Apply transactions one at a time (receipts, roots, bloom and gas follow)
//! 3. Validate (parent timestamp, then structural rules)
//! 4. Seal the header fields only known at the end (mine)
//! 5. Store the block, which can later be rebuilt from its header
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use frontier_blockchain::{Blockchain, BlockchainOptions};
//!
//! let blockchain = Blockchain::new(store, BlockchainOptions::default());
//! let mut block = blockchain.new_block(header);
//! block.apply_transaction(&mut engine, tx)?;
//! blockchain.add_block(&block)?;
//! ```

pub mod block;
pub mod error;
pub mod validation;

use std::time::Instant;

use block::Block;
use error::ChainError;
use frontier_common::{
    constants::{MAX_EXTRA_DATA_SIZE, MAX_UNCLES},
    types::{BlockHash, BlockHeader},
};
use frontier_storage::Store;
use tracing::{debug, info, instrument};
use validation::ValidationPipeline;

pub use block::BlockBuilder;

#[derive(Debug, Clone)]
pub struct BlockchainOptions {
    /// Maximum size in bytes of a header's extra data.
    pub max_extra_data_size: usize,
    /// Maximum number of uncles per block.
    pub max_uncles: usize,
    /// Whether to emit performance logging.
    pub perf_logs_enabled: bool,
}

impl Default for BlockchainOptions {
    fn default() -> Self {
        Self {
            max_extra_data_size: MAX_EXTRA_DATA_SIZE,
            max_uncles: MAX_UNCLES,
            perf_logs_enabled: false,
        }
    }
}

pub struct Blockchain {
    /// Underlying storage for headers, uncles and block indexes.
    storage: Store,
    /// Configuration options for blockchain behavior.
    pub options: BlockchainOptions,
    pipeline: ValidationPipeline,
}

impl Blockchain {
    pub fn new(store: Store, blockchain_opts: BlockchainOptions) -> Self {
        Self {
            storage: store,
            pipeline: ValidationPipeline::frontier(&blockchain_opts),
            options: blockchain_opts,
        }
    }

    pub fn default_with_store(store: Store) -> Self {
        Self::new(store, BlockchainOptions::default())
    }

    /// Replaces the validation rules applied by [`Blockchain::add_block`].
    pub fn with_pipeline(mut self, pipeline: ValidationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn storage(&self) -> &Store {
        &self.storage
    }

    /// Starts assembling a block over `header`, bound to this chain's store.
    pub fn new_block(&self, header: BlockHeader) -> Block {
        Block::new(header, Vec::new(), Vec::new(), self.storage.clone())
    }

    pub fn block_from_header(&self, header: BlockHeader) -> Result<Block, ChainError> {
        Block::from_header(header, self.storage.clone())
    }

    pub fn validate_block(&self, block: &Block) -> Result<(), ChainError> {
        block.validate_with(&self.pipeline)
    }

    /// Validates `block` and stores its header and uncles. The block's indexes are
    /// already in the store, as they were written while its transactions were applied.
    #[instrument(
        level = "trace",
        name = "Block DB update",
        skip_all,
        fields(namespace = "block_storage")
    )]
    pub fn add_block(&self, block: &Block) -> Result<(), ChainError> {
        let since = Instant::now();
        self.validate_block(block)?;
        let validated = Instant::now();

        let block_hash = block.hash();
        self.storage.add_uncles(block.uncles())?;
        self.storage.add_block_header(block_hash, block.header())?;
        let stored = Instant::now();
        debug!(number = block.number(), hash = %block_hash, "Stored block");

        if self.options.perf_logs_enabled {
            Self::print_add_block_logs(block, since, validated, stored);
        }
        Ok(())
    }

    /// Rebuilds a stored block. `None` if no header is stored under `block_hash`.
    pub fn get_block_by_hash(&self, block_hash: BlockHash) -> Result<Option<Block>, ChainError> {
        self.storage
            .get_block_header_by_hash(block_hash)?
            .map(|header| self.block_from_header(header))
            .transpose()
    }

    fn print_add_block_logs(block: &Block, since: Instant, validated: Instant, stored: Instant) {
        let interval = stored.duration_since(since).as_millis();
        info!(
            "[METRIC] BLOCK {} STORED: {} ms (validation {} ms). Gas Used: {} of {}, #Txs: {}.",
            block.number(),
            interval,
            validated.duration_since(since).as_millis(),
            block.header().gas_used,
            block.header().gas_limit,
            block.transactions().len()
        );
    }
}

/// Searchs the header of the parent block header. If the parent header is missing,
/// Returns a ChainError::ParentNotFound. If the storage has an error it propagates it
pub fn find_parent_header(
    block_header: &BlockHeader,
    storage: &Store,
) -> Result<BlockHeader, ChainError> {
    debug!(parent_hash = %block_header.parent_hash, "Looking up parent header");
    match storage.get_block_header_by_hash(block_header.parent_hash)? {
        Some(parent_header) => Ok(parent_header),
        None => Err(ChainError::ParentNotFound(block_header.parent_hash)),
    }
}
