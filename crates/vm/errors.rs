use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    #[error("Invalid Transaction: {0}")]
    Transaction(String),
    #[error("Database access error: {0}")]
    DB(String),
    #[error(
        "Engine reported {gas_remaining} gas remaining for a transaction with a gas limit of {gas_limit}"
    )]
    GasRemainingExceedsLimit { gas_limit: u64, gas_remaining: u64 },
    #[error("{0}")]
    Custom(String),
}
