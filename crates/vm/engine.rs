use frontier_common::types::Transaction;

use crate::{errors::EvmError, execution_result::Computation};

/// Executes single transactions against the world state it owns.
///
/// A transaction that fails inside the engine is reported through
/// [`Computation::error`] and still yields a computation. `Err` is reserved
/// for faults that leave the engine unusable, after which the block being
/// assembled must be discarded.
pub trait ExecutionEngine {
    fn apply_transaction(&mut self, tx: &Transaction) -> Result<Computation, EvmError>;
}

impl<E: ExecutionEngine + ?Sized> ExecutionEngine for &mut E {
    fn apply_transaction(&mut self, tx: &Transaction) -> Result<Computation, EvmError> {
        (**self).apply_transaction(tx)
    }
}

impl<E: ExecutionEngine + ?Sized> ExecutionEngine for Box<E> {
    fn apply_transaction(&mut self, tx: &Transaction) -> Result<Computation, EvmError> {
        (**self).apply_transaction(tx)
    }
}
