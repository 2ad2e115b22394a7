//! Block validity rules.
//!
//! Validation runs in two stages. The parent stage checks the block against
//! its parent header. The structural stage only looks at the block itself.
//! Stages run in that order and the first failing rule aborts validation.

use frontier_common::types::{compute_transactions_root, compute_uncles_hash};
use tracing::{trace, warn};

use crate::{
    BlockchainOptions,
    block::Block,
    error::{ChainError, InvalidBlockError},
};

/// A single validity rule.
pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, block: &Block) -> Result<(), ChainError>;
}

#[derive(Default)]
pub struct ValidationPipeline {
    parent_stage: Vec<Box<dyn Validator>>,
    structural_stage: Vec<Box<dyn Validator>>,
}

impl ValidationPipeline {
    /// A pipeline with no rules at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The frontier rule set, bounded by `options`.
    pub fn frontier(options: &BlockchainOptions) -> Self {
        Self::new()
            .with_parent_validator(ParentTimestampValidator)
            .with_structural_validator(ExtraDataValidator {
                max_size: options.max_extra_data_size,
            })
            .with_structural_validator(GasUsedValidator)
            .with_structural_validator(UnclesValidator {
                max_uncles: options.max_uncles,
            })
            .with_structural_validator(TransactionRootValidator)
    }

    pub fn with_parent_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.parent_stage.push(Box::new(validator));
        self
    }

    pub fn with_structural_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.structural_stage.push(Box::new(validator));
        self
    }

    pub fn run(&self, block: &Block) -> Result<(), ChainError> {
        for validator in self.parent_stage.iter().chain(self.structural_stage.iter()) {
            trace!(
                rule = validator.name(),
                number = block.header().number,
                "Validating block"
            );
            validator.validate(block).inspect_err(|err| {
                warn!(
                    rule = validator.name(),
                    number = block.header().number,
                    hash = %block.hash(),
                    "Block failed validation: {err}"
                )
            })?;
        }
        Ok(())
    }
}

/// Requires a non-genesis block to be strictly younger than its parent.
pub struct ParentTimestampValidator;

impl Validator for ParentTimestampValidator {
    fn name(&self) -> &'static str {
        "parent_timestamp"
    }

    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let header = block.header();
        if header.is_genesis() {
            return Ok(());
        }
        let parent = block.parent_header()?;
        if header.timestamp <= parent.timestamp {
            return Err(InvalidBlockError::TimestampNotAfterParent {
                timestamp: header.timestamp,
                parent_timestamp: parent.timestamp,
            }
            .into());
        }
        Ok(())
    }
}

pub struct ExtraDataValidator {
    pub max_size: usize,
}

impl Validator for ExtraDataValidator {
    fn name(&self) -> &'static str {
        "extra_data"
    }

    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let size = block.header().extra_data.len();
        if size > self.max_size {
            return Err(InvalidBlockError::ExtraDataTooLong {
                size,
                max: self.max_size,
            }
            .into());
        }
        Ok(())
    }
}

pub struct GasUsedValidator;

impl Validator for GasUsedValidator {
    fn name(&self) -> &'static str {
        "gas_used"
    }

    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let header = block.header();
        if header.gas_used > header.gas_limit {
            return Err(InvalidBlockError::GasUsedExceedsGasLimit {
                gas_used: header.gas_used,
                gas_limit: header.gas_limit,
            }
            .into());
        }
        Ok(())
    }
}

/// Bounds the uncle count and checks the header commits to the block's uncles.
pub struct UnclesValidator {
    pub max_uncles: usize,
}

impl Validator for UnclesValidator {
    fn name(&self) -> &'static str {
        "uncles"
    }

    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let count = block.uncles().len();
        if count > self.max_uncles {
            return Err(InvalidBlockError::TooManyUncles {
                count,
                max: self.max_uncles,
            }
            .into());
        }
        let computed = compute_uncles_hash(block.uncles());
        if computed != block.header().uncles_hash {
            return Err(InvalidBlockError::UnclesHashMismatch {
                header: block.header().uncles_hash,
                computed,
            }
            .into());
        }
        Ok(())
    }
}

/// Recomputes the transaction root from scratch, independent of the block's own index.
pub struct TransactionRootValidator;

impl Validator for TransactionRootValidator {
    fn name(&self) -> &'static str {
        "transaction_root"
    }

    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let computed = compute_transactions_root(block.transactions())?;
        if computed != block.header().transaction_root {
            return Err(InvalidBlockError::TransactionRootMismatch {
                header: block.header().transaction_root,
                computed,
            }
            .into());
        }
        Ok(())
    }
}
