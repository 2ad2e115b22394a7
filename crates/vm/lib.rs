mod engine;
mod errors;
mod execution_result;

pub use engine::ExecutionEngine;
pub use errors::EvmError;
pub use execution_result::{Computation, LogEntry, TxExecutionError};
