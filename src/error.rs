//! Chain error taxonomy.
//!
//! Failures that surface from the Sui interface. Application flow wraps these
//! in `anyhow` with context; user-facing surfaces render only the message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    #[error("Transaction failed: {message}{}", tx_digest.as_ref().map(|d| format!(" (tx: {})", d)).unwrap_or_default())]
    Transaction {
        message: String,
        tx_digest: Option<String>,
    },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid object format: {0}")]
    InvalidObjectFormat(String),

    #[error("No gas coin with at least {required} MIST available for {address}")]
    InsufficientGas { address: String, required: u64 },

    #[error("Timed out waiting for balance: last seen {last_seen} MIST, required {required} MIST after {attempts} attempts")]
    BalanceWaitTimeout {
        last_seen: u64,
        required: u64,
        attempts: u32,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
