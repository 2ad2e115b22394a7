use std::{collections::BTreeMap, fmt};

use frontier_common::{
    Bloom, H256,
    constants::EMPTY_TRIE_HASH,
    types::{
        BlockHash, BlockHeader, HeaderUpdate, HeaderValue, Receipt, Transaction,
        transaction_index_key,
    },
};
use frontier_rlp::{decode::RLPDecode, encode::RLPEncode};
use frontier_storage::Store;
use frontier_trie::Trie;
use frontier_vm::{Computation, EvmError, ExecutionEngine};
use tracing::{debug, instrument, trace};

use crate::{error::ChainError, find_parent_header, validation::ValidationPipeline};

/// A block under assembly or reconstructed from the store.
///
/// The transaction and receipt indexes are tries opened over the block's
/// store at the header's roots. Applying a transaction writes through to
/// both and moves the header's commitment fields to the new roots.
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Transaction>,
    uncles: Vec<BlockHeader>,
    bloom: Bloom,
    transaction_trie: Trie,
    receipt_trie: Trie,
    store: Store,
    /// Cumulative gas used, tagged with the receipt root it was computed at.
    cumulative_gas: Option<(H256, u64)>,
}

impl Block {
    pub fn new(
        header: BlockHeader,
        transactions: Vec<Transaction>,
        uncles: Vec<BlockHeader>,
        store: Store,
    ) -> Self {
        let transaction_trie = store.open_trie(header.transaction_root);
        let receipt_trie = store.open_trie(header.receipt_root);
        Self {
            bloom: header.bloom,
            header,
            transactions,
            uncles,
            transaction_trie,
            receipt_trie,
            store,
            cumulative_gas: None,
        }
    }

    pub fn builder(header: BlockHeader) -> BlockBuilder {
        BlockBuilder::new(header)
    }

    /// Rebuilds a block from its header alone, loading its uncles and transactions from `store`.
    /// Nothing is executed.
    pub fn from_header(header: BlockHeader, store: Store) -> Result<Self, ChainError> {
        let uncles = store
            .get_uncles(header.uncles_hash)?
            .ok_or(ChainError::UnclesNotFound(header.uncles_hash))?;
        let transactions = read_indexed(&store.open_trie(header.transaction_root))?;
        Ok(Self::new(header, transactions, uncles, store))
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn hash(&self) -> BlockHash {
        self.header.hash()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn uncles(&self) -> &[BlockHeader] {
        &self.uncles
    }

    /// Union of the blooms of every receipt applied so far, on top of the construction bloom.
    pub fn bloom(&self) -> Bloom {
        self.bloom
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Runs `tx` through `engine` and records it, with its receipt, in the block.
    ///
    /// A transaction the engine fails still lands in the block and is charged its
    /// whole gas allowance. An `Err` means the block is no longer consistent and
    /// must be discarded.
    #[instrument(level = "trace", skip_all, fields(namespace = "block_assembly"))]
    pub fn apply_transaction<E: ExecutionEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        tx: Transaction,
    ) -> Result<Computation, ChainError> {
        let computation = engine.apply_transaction(&tx)?;
        let logs = computation.receipt_logs();

        let cumulative_before = self.cumulative_gas_used()?;
        let tx_gas_used = if computation.is_error() {
            tx.gas
        } else {
            let gas_remaining = computation.gas_remaining;
            let Some(base) = tx.gas.checked_sub(gas_remaining) else {
                return Err(EvmError::GasRemainingExceedsLimit {
                    gas_limit: tx.gas,
                    gas_remaining,
                }
                .into());
            };
            let refund = computation.gas_refunded.min(base / 2);
            base - refund
        };
        let gas_used = cumulative_before
            .checked_add(tx_gas_used)
            .ok_or_else(|| ChainError::Custom("Gas used overflow".to_string()))?;
        debug!(
            tx_hash = %tx.hash(),
            failed = computation.is_error(),
            tx_gas_used,
            gas_used,
            "Applied transaction"
        );

        let receipt = Receipt::new(computation.state_root, gas_used, logs);

        let transaction_idx = self.transactions.len();
        let key = transaction_index_key(transaction_idx);
        let encoded_tx = tx.encode_to_vec();
        self.transactions.push(tx);

        self.transaction_trie.insert(&key, encoded_tx)?;
        self.receipt_trie.insert(&key, receipt.encode_to_vec())?;
        trace!(
            transaction_idx,
            transaction_root = %self.transaction_trie.hash(),
            receipt_root = %self.receipt_trie.hash(),
            "Indexed transaction and receipt"
        );

        self.bloom.accrue_bloom(&receipt.bloom);

        let receipt_root = self.receipt_trie.hash();
        self.header.transaction_root = self.transaction_trie.hash();
        self.header.state_root = computation.state_root;
        self.header.receipt_root = receipt_root;
        self.header.bloom = self.bloom;
        self.header.gas_used = gas_used;
        self.cumulative_gas = Some((receipt_root, gas_used));

        Ok(computation)
    }

    /// Gas used by every transaction in the block so far, as recorded by the last receipt.
    pub fn cumulative_gas_used(&self) -> Result<u64, ChainError> {
        let receipt_root = self.receipt_trie.hash();
        if receipt_root == EMPTY_TRIE_HASH {
            return Ok(0);
        }
        match self.cumulative_gas {
            Some((cached_root, gas)) if cached_root == receipt_root => Ok(gas),
            _ => match self.transactions.len().checked_sub(1) {
                Some(last) => Ok(self.receipt(last)?.cumulative_gas_used),
                // bound to existing indexes without their transactions
                None => Ok(self
                    .receipts()?
                    .last()
                    .map_or(0, |receipt| receipt.cumulative_gas_used)),
            },
        }
    }

    /// Every receipt in the receipt index, in transaction order.
    pub fn receipts(&self) -> Result<Vec<Receipt>, ChainError> {
        read_indexed(&self.receipt_trie)
    }

    pub fn receipt(&self, index: usize) -> Result<Receipt, ChainError> {
        let encoded = self
            .receipt_trie
            .get(&transaction_index_key(index))?
            .ok_or(ChainError::ReceiptNotFound(index))?;
        Ok(Receipt::decode(&encoded)?)
    }

    /// Validates the block with the frontier rules and default limits.
    pub fn validate(&self) -> Result<(), ChainError> {
        self.validate_with(&ValidationPipeline::frontier(&Default::default()))
    }

    pub fn validate_with(&self, pipeline: &ValidationPipeline) -> Result<(), ChainError> {
        pipeline.run(self)
    }

    pub fn parent_header(&self) -> Result<BlockHeader, ChainError> {
        find_parent_header(&self.header, &self.store)
    }

    pub fn parent(&self) -> Result<Block, ChainError> {
        Block::from_header(self.parent_header()?, self.store.clone())
    }

    /// Sets header fields only known once the block is assembled.
    pub fn mine(&mut self, updates: impl IntoIterator<Item = HeaderUpdate>) {
        for update in updates {
            trace!(field = update.field_name(), "Setting header field");
            self.header.apply(update);
        }
    }

    /// Like [`Block::mine`], with fields given by name. Fails without touching the
    /// header if any name is unknown or any value has the wrong type.
    pub fn mine_named(&mut self, fields: BTreeMap<String, HeaderValue>) -> Result<(), ChainError> {
        let updates = HeaderUpdate::from_named_fields(fields)?;
        self.mine(updates);
        Ok(())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("header", &self.header)
            .field("transactions", &self.transactions.len())
            .field("uncles", &self.uncles.len())
            .finish_non_exhaustive()
    }
}

/// Decodes the values stored under keys 0, 1, 2, ... up to the first missing one.
fn read_indexed<T: RLPDecode>(trie: &Trie) -> Result<Vec<T>, ChainError> {
    let mut items = Vec::new();
    while let Some(encoded) = trie.get(&transaction_index_key(items.len()))? {
        items.push(T::decode(&encoded)?);
    }
    Ok(items)
}

/// Assembles a [`Block`] from optional parts. Transactions and uncles default to empty.
pub struct BlockBuilder {
    header: BlockHeader,
    transactions: Vec<Transaction>,
    uncles: Vec<BlockHeader>,
    store: Option<Store>,
}

impl BlockBuilder {
    pub fn new(header: BlockHeader) -> Self {
        Self {
            header,
            transactions: Vec::new(),
            uncles: Vec::new(),
            store: None,
        }
    }

    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn uncles(mut self, uncles: Vec<BlockHeader>) -> Self {
        self.uncles = uncles;
        self
    }

    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Block, ChainError> {
        let store = self.store.ok_or(ChainError::MissingStore)?;
        Ok(Block::new(self.header, self.transactions, self.uncles, store))
    }
}
