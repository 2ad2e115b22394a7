use bytes::Bytes;
use ethereum_types::{Address, H256};
use frontier_common::types::Log;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a transaction halted without completing.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxExecutionError {
    #[error("Out of gas")]
    OutOfGas,
    #[error("Execution reverted")]
    Revert,
    #[error("Invalid opcode 0x{0:02x}")]
    InvalidOpcode(u8),
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Invalid jump destination")]
    InvalidJump,
    #[error("{0}")]
    Custom(String),
}

/// A log as emitted by the engine, before it is recorded in a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}

impl From<LogEntry> for Log {
    fn from(entry: LogEntry) -> Self {
        Log {
            address: entry.address,
            topics: entry.topics,
            data: entry.data,
        }
    }
}

/// Outcome of running one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Computation {
    pub error: Option<TxExecutionError>,
    pub gas_remaining: u64,
    /// Refund counter before the cap is applied.
    pub gas_refunded: u64,
    /// World state root after the transaction.
    pub state_root: H256,
    pub logs: Vec<LogEntry>,
    pub output: Bytes,
}

impl Computation {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Logs of this computation as receipt logs. A failed computation keeps
    /// whatever logs the engine reported.
    pub fn receipt_logs(&self) -> Vec<Log> {
        self.logs.iter().cloned().map(Log::from).collect()
    }
}
